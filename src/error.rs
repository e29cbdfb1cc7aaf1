// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

use crate::kubernetes::GroupVersionId;

#[derive(Error, Debug)]
pub enum PreflightError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("API group discovery failed for {group}: {source}")]
    RequiredGroupError {
        group: GroupVersionId,
        source: kube::Error,
    },

    #[error("failed to determine support for the K8s legacy signer. Use the --force flag to ignore this: {0}")]
    SignerProbeError(#[source] kube::Error),

    #[error("configuration PILOT_CERT_PROVIDER={value} not supported in k8s minor version {minor}. Please pick another value for PILOT_CERT_PROVIDER")]
    UnsupportedProviderError { value: String, minor: u32 },
}

pub type Result<T> = std::result::Result<T, PreflightError>;
