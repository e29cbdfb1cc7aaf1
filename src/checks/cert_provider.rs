// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Certificate provider validation against the server version.

use kube::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::constants::signer::{
    KUBERNETES_PROVIDER, LEGACY_SIGNER_MAX_MAJOR, LEGACY_SIGNER_REMOVED_MINOR,
};
use crate::constants::values::{GLOBAL_KEY, PILOT_CERT_PROVIDER_KEY};
use crate::error::{PreflightError, Result};
use crate::kubernetes::server_version;

/// Validate that the configured `global.pilotCertProvider` is usable on the
/// connected cluster.
///
/// A missing `global` section, a `global` that is not a mapping, and a
/// missing or non-string provider value all mean the default provider is in
/// effect and pass without a probe. Only the literal `kubernetes` provider is
/// gated: it depends on the legacy in-cluster signer, which the API server
/// stopped shipping at the 1.22 line.
#[instrument(skip(client, values))]
pub async fn validate_cert_provider(client: &Client, values: &Value) -> Result<()> {
    let Some(provider) = configured_cert_provider(values) else {
        debug!("No explicit pilotCertProvider configured, nothing to validate");
        return Ok(());
    };

    if provider != KUBERNETES_PROVIDER {
        debug!("Cert provider '{}' does not depend on the legacy signer", provider);
        return Ok(());
    }

    let version = server_version(client)
        .await
        .map_err(PreflightError::SignerProbeError)?;

    if version.minor >= LEGACY_SIGNER_REMOVED_MINOR || version.major > LEGACY_SIGNER_MAX_MAJOR {
        return Err(PreflightError::UnsupportedProviderError {
            value: provider.to_string(),
            minor: version.minor,
        });
    }

    Ok(())
}

/// Read `global.pilotCertProvider` from a loosely typed values document.
/// Absence or a shape mismatch at either level yields `None`.
fn configured_cert_provider(values: &Value) -> Option<&str> {
    values
        .get(GLOBAL_KEY)?
        .as_object()?
        .get(PILOT_CERT_PROVIDER_KEY)?
        .as_str()
}
