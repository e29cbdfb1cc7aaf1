// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Aggregated API discovery with per-group failure tracking.
//!
//! The stock discovery helpers treat any group that fails to answer as fatal.
//! The probes in this crate need the weaker contract the API server itself
//! offers: a group version that cannot be enumerated (e.g. a broken
//! aggregated API service) must not hide the groups that answered fine.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::Client;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

use crate::error::Result;

/// Identity of one discoverable API group version. The core (legacy) group is
/// the empty string, matching its wire representation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupVersionId {
    pub group: String,
    pub version: String,
}

impl GroupVersionId {
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    /// Identity for a version of the core group
    pub fn core(version: impl Into<String>) -> Self {
        Self::new("", version)
    }
}

impl fmt::Display for GroupVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// The resources served under one group version.
#[derive(Debug, Clone)]
pub struct GroupResources {
    pub id: GroupVersionId,
    pub resources: Vec<String>,
}

impl GroupResources {
    fn from_list(id: GroupVersionId, list: APIResourceList) -> Self {
        Self {
            id,
            resources: list.resources.into_iter().map(|r| r.name).collect(),
        }
    }

    /// Check whether a resource with the given name is served here
    pub fn serves(&self, name: &str) -> bool {
        self.resources.iter().any(|r| r == name)
    }
}

/// Group versions that advertised themselves but failed to enumerate their
/// resources, keyed by identity.
#[derive(Debug, Default)]
pub struct GroupDiscoveryFailure {
    failures: BTreeMap<GroupVersionId, kube::Error>,
}

impl GroupDiscoveryFailure {
    fn record(&mut self, id: GroupVersionId, err: kube::Error) {
        self.failures.insert(id, err);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn contains(&self, id: &GroupVersionId) -> bool {
        self.failures.contains_key(id)
    }

    /// Remove and return the failure recorded for a group version, if any
    pub fn take(&mut self, id: &GroupVersionId) -> Option<kube::Error> {
        self.failures.remove(id)
    }

    pub fn group_versions(&self) -> impl Iterator<Item = &GroupVersionId> {
        self.failures.keys()
    }
}

impl fmt::Display for GroupDiscoveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in self.failures.keys() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}", id)?;
            first = false;
        }
        Ok(())
    }
}

/// Result of one full discovery pass.
#[derive(Debug)]
pub enum DiscoveryOutcome {
    /// Every advertised group version answered
    Complete(Vec<GroupResources>),
    /// Some group versions failed; the rest of the snapshot is usable
    Degraded {
        groups: Vec<GroupResources>,
        failures: GroupDiscoveryFailure,
    },
}

impl DiscoveryOutcome {
    /// The group versions that answered, regardless of degradation
    pub fn groups(&self) -> &[GroupResources] {
        match self {
            DiscoveryOutcome::Complete(groups) => groups,
            DiscoveryOutcome::Degraded { groups, .. } => groups,
        }
    }
}

/// Query the API server for every advertised group version and the resources
/// each of them serves.
///
/// A failure to list the advertised groups themselves is returned as an
/// error. A failure of an individual group version is recorded in the
/// outcome instead, so callers can decide whether the group they care about
/// is among the failed ones.
#[instrument(skip(client))]
pub async fn server_groups_and_resources(client: &Client) -> Result<DiscoveryOutcome> {
    let mut groups = Vec::new();
    let mut failures = GroupDiscoveryFailure::default();

    let core = client.list_core_api_versions().await?;
    for version in &core.versions {
        let id = GroupVersionId::core(version);
        match client.list_core_api_resources(version).await {
            Ok(list) => groups.push(GroupResources::from_list(id, list)),
            Err(e) => {
                debug!("Resource enumeration failed for {}: {}", id, e);
                failures.record(id, e);
            }
        }
    }

    let advertised = client.list_api_groups().await?;
    for group in &advertised.groups {
        for discovered in &group.versions {
            let id = GroupVersionId::new(&group.name, &discovered.version);
            match client.list_api_group_resources(&discovered.group_version).await {
                Ok(list) => groups.push(GroupResources::from_list(id, list)),
                Err(e) => {
                    debug!("Resource enumeration failed for {}: {}", id, e);
                    failures.record(id, e);
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(DiscoveryOutcome::Complete(groups))
    } else {
        Ok(DiscoveryOutcome::Degraded { groups, failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        api_group_list_json, api_resource_list_json, api_versions_json, MockApiServer,
    };

    #[test]
    fn test_group_version_id_display() {
        assert_eq!(GroupVersionId::core("v1").to_string(), "v1");
        assert_eq!(
            GroupVersionId::new("authentication.k8s.io", "v1").to_string(),
            "authentication.k8s.io/v1"
        );
    }

    #[tokio::test]
    async fn test_discovery_complete() {
        let client = MockApiServer::new()
            .serve("/api", api_versions_json(&["v1"]))
            .serve("/api/v1", api_resource_list_json("v1", &["pods", "serviceaccounts"]))
            .serve("/apis", api_group_list_json(&[("apps", "v1")]))
            .serve("/apis/apps/v1", api_resource_list_json("apps/v1", &["deployments"]))
            .into_client();

        let outcome = server_groups_and_resources(&client).await.unwrap();
        let groups = match &outcome {
            DiscoveryOutcome::Complete(groups) => groups,
            other => panic!("expected complete discovery, got {:?}", other),
        };

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, GroupVersionId::core("v1"));
        assert!(groups[0].serves("serviceaccounts"));
        assert_eq!(groups[1].id, GroupVersionId::new("apps", "v1"));
        assert!(groups[1].serves("deployments"));
        assert!(!groups[1].serves("pods"));
    }

    #[tokio::test]
    async fn test_discovery_degraded_records_failed_group() {
        let client = MockApiServer::new()
            .serve("/api", api_versions_json(&["v1"]))
            .serve("/api/v1", api_resource_list_json("v1", &["pods"]))
            .serve(
                "/apis",
                api_group_list_json(&[("apps", "v1"), ("metrics.k8s.io", "v1beta1")]),
            )
            .serve("/apis/apps/v1", api_resource_list_json("apps/v1", &["deployments"]))
            .fail("/apis/metrics.k8s.io/v1beta1", 503)
            .into_client();

        let outcome = server_groups_and_resources(&client).await.unwrap();
        match outcome {
            DiscoveryOutcome::Degraded { groups, failures } => {
                assert_eq!(groups.len(), 2);
                assert!(failures.contains(&GroupVersionId::new("metrics.k8s.io", "v1beta1")));
                assert!(!failures.contains(&GroupVersionId::new("apps", "v1")));
                assert_eq!(failures.to_string(), "metrics.k8s.io/v1beta1");
            }
            other => panic!("expected degraded discovery, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_discovery_group_listing_failure_is_fatal() {
        let client = MockApiServer::new()
            .serve("/api", api_versions_json(&["v1"]))
            .serve("/api/v1", api_resource_list_json("v1", &["pods"]))
            .fail("/apis", 503)
            .into_client();

        assert!(server_groups_and_resources(&client).await.is_err());
    }
}
