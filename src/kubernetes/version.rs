// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API server version probing with defensive component parsing.

use kube::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Major and minor version reported by the API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
}

/// Fetch the version reported by the API server.
#[instrument(skip(client))]
pub async fn server_version(client: &Client) -> kube::Result<ServerVersion> {
    let info = client.apiserver_version().await?;
    debug!("API server reports version {}.{}", info.major, info.minor);
    Ok(ServerVersion {
        major: parse_version_component(&info.major),
        minor: parse_version_component(&info.minor),
    })
}

/// Parse the leading decimal digits of a reported version component.
///
/// Servers report components as text and some providers append a build
/// suffix, e.g. a minor of `"21+"`. This takes the digits up to the first
/// non-digit character; a component with no leading digits parses to zero,
/// never to an error, so a single unparseable component cannot sink an
/// otherwise successful probe.
pub fn parse_version_component(raw: &str) -> u32 {
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
