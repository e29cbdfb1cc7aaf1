// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Token issuance policy detection.

use kube::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::constants::discovery::{
    AUTHENTICATION_GROUP, AUTHENTICATION_VERSION, TOKEN_REQUEST_RESOURCE,
};
use crate::error::{PreflightError, Result};
use crate::kubernetes::{server_groups_and_resources, DiscoveryOutcome, GroupVersionId};

/// Which mechanism the cluster uses to mint workload identity tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenPolicy {
    /// Long-lived service account secret tokens
    FirstPartyJwt,
    /// Short-lived tokens minted on demand through the TokenRequest API
    ThirdPartyJwt,
}

impl fmt::Display for TokenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPolicy::FirstPartyJwt => f.write_str("first-party-jwt"),
            TokenPolicy::ThirdPartyJwt => f.write_str("third-party-jwt"),
        }
    }
}

/// Detect whether the API server supports on-demand token issuance.
///
/// Passing `None` (no cluster connection configured, as in an isolated test
/// harness) short-circuits to [`TokenPolicy::ThirdPartyJwt`] without a probe.
///
/// Discovery may come back degraded when an aggregated API service is down.
/// That only matters if `authentication.k8s.io/v1` itself is among the failed
/// groups; a failure elsewhere leaves the decision intact and is ignored.
#[instrument(skip(client))]
pub async fn detect_supported_token_policy(client: Option<&Client>) -> Result<TokenPolicy> {
    let Some(client) = client else {
        debug!("No cluster connection configured, assuming {}", TokenPolicy::ThirdPartyJwt);
        return Ok(TokenPolicy::ThirdPartyJwt);
    };

    let groups = match server_groups_and_resources(client).await? {
        DiscoveryOutcome::Complete(groups) => groups,
        DiscoveryOutcome::Degraded { groups, mut failures } => {
            let required = GroupVersionId::new(AUTHENTICATION_GROUP, AUTHENTICATION_VERSION);
            if let Some(source) = failures.take(&required) {
                return Err(PreflightError::RequiredGroupError {
                    group: required,
                    source,
                });
            }
            warn!("Ignoring discovery failures for unrelated groups: {}", failures);
            groups
        }
    };

    if groups.iter().any(|g| g.serves(TOKEN_REQUEST_RESOURCE)) {
        debug!(
            "API server serves {}, token policy is {}",
            TOKEN_REQUEST_RESOURCE,
            TokenPolicy::ThirdPartyJwt
        );
        return Ok(TokenPolicy::ThirdPartyJwt);
    }

    debug!(
        "API server does not serve {}, token policy is {}",
        TOKEN_REQUEST_RESOURCE,
        TokenPolicy::FirstPartyJwt
    );
    Ok(TokenPolicy::FirstPartyJwt)
}
