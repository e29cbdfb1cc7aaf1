// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes API server introspection: aggregated discovery and version probing.

pub mod discovery;
pub mod version;

pub use discovery::{
    server_groups_and_resources, DiscoveryOutcome, GroupDiscoveryFailure, GroupResources,
    GroupVersionId,
};
pub use version::{parse_version_component, server_version, ServerVersion};
