// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::Parser;
use kube::Client;
use tracing::{info, warn};

use preflight::checks::{detect_supported_token_policy, validate_cert_provider};

/// Pre-flight compatibility checks for a mesh control plane installation.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Operator values document (YAML) to validate against the cluster
    #[arg(short, long)]
    values: Option<String>,
    /// Continue past a failed certificate provider check
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Create Kubernetes client
    let client = Client::try_default()
        .await
        .context("Failed to connect to Kubernetes cluster")?;
    info!("Connected to Kubernetes cluster");

    let policy = detect_supported_token_policy(Some(&client)).await?;
    info!("Detected supported token issuance policy: {}", policy);

    if let Some(path) = &args.values {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read values file {}", path))?;
        let values: serde_json::Value = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse values file {}", path))?;

        match validate_cert_provider(&client, &values).await {
            Ok(()) => info!("Certificate provider configuration is compatible with this cluster"),
            Err(e) if args.force => {
                warn!("Ignoring failed certificate provider check (--force): {}", e)
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
