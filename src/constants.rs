// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API discovery identifiers the token policy probe depends on
pub mod discovery {
    /// Subresource whose presence indicates TokenRequest support
    pub const TOKEN_REQUEST_RESOURCE: &str = "serviceaccounts/token";
    /// Group that must have been discoverable for the decision to be safe
    pub const AUTHENTICATION_GROUP: &str = "authentication.k8s.io";
    /// Version of the authentication group carrying TokenRequest
    pub const AUTHENTICATION_VERSION: &str = "v1";
}

/// Keys read from the operator values document
pub mod values {
    /// Top-level section holding mesh-wide settings
    pub const GLOBAL_KEY: &str = "global";
    /// Certificate provider for the control plane, within `global`
    pub const PILOT_CERT_PROVIDER_KEY: &str = "pilotCertProvider";
}

/// Certificate provider gating against the server version
pub mod signer {
    /// Provider value backed by the legacy in-cluster signer
    pub const KUBERNETES_PROVIDER: &str = "kubernetes";
    /// Minor version at which the legacy signer was removed from the 1.x line
    pub const LEGACY_SIGNER_REMOVED_MINOR: u32 = 22;
    /// Last major version line that ever shipped the legacy signer
    pub const LEGACY_SIGNER_MAX_MAJOR: u32 = 1;
}
