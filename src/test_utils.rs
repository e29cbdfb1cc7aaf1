// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking API server discovery and version responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock API server returning canned responses keyed by exact request path.
///
/// Paths without a registered response get the API server's standard 404
/// Status body, so a test that passes without registering a path proves the
/// code under test never issued that request.
#[derive(Clone, Default)]
pub struct MockApiServer {
    responses: Arc<Mutex<HashMap<String, (u16, String)>>>,
}

impl MockApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a 200 response with the given JSON body on `path`
    pub fn serve(self, path: &str, body: String) -> Self {
        self.respond(path, 200, body)
    }

    /// Fail requests on `path` with a Status body of the given code
    pub fn fail(self, path: &str, code: u16) -> Self {
        let body = status_json(code, "the server is currently unable to handle the request");
        self.respond(path, code, body)
    }

    fn respond(self, path: &str, status: u16, body: String) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
        self
    }

    /// Build a kube Client backed by this mock
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }
}

impl Service<Request<Body>> for MockApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let path = req.uri().path().to_string();
        let response = self.responses.lock().unwrap().get(&path).cloned();

        Box::pin(async move {
            let (status, body) =
                response.unwrap_or_else(|| (404, status_json(404, "the server could not find the requested resource")));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// APIVersions body served on `/api` for the core group
pub fn api_versions_json(versions: &[&str]) -> String {
    json!({
        "kind": "APIVersions",
        "versions": versions,
        "serverAddressByClientCIDRs": [
            {"clientCIDR": "0.0.0.0/0", "serverAddress": "10.96.0.1:443"}
        ]
    })
    .to_string()
}

/// APIGroupList body served on `/apis`, advertising each (group, version) pair
pub fn api_group_list_json(groups: &[(&str, &str)]) -> String {
    let groups: Vec<_> = groups
        .iter()
        .map(|(group, version)| {
            let group_version = format!("{}/{}", group, version);
            json!({
                "name": group,
                "versions": [{"groupVersion": group_version, "version": version}],
                "preferredVersion": {"groupVersion": group_version, "version": version}
            })
        })
        .collect();

    json!({"kind": "APIGroupList", "apiVersion": "v1", "groups": groups}).to_string()
}

/// APIResourceList body enumerating the named resources of one group version
pub fn api_resource_list_json(group_version: &str, resources: &[&str]) -> String {
    let resources: Vec<_> = resources
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "singularName": "",
                "namespaced": true,
                "kind": "Resource",
                "verbs": ["get", "list"]
            })
        })
        .collect();

    json!({
        "kind": "APIResourceList",
        "groupVersion": group_version,
        "resources": resources
    })
    .to_string()
}

/// Version Info body served on `/version`
pub fn version_info_json(major: &str, minor: &str) -> String {
    json!({
        "major": major,
        "minor": minor,
        "gitVersion": format!("v{}.{}.0", major, minor),
        "gitCommit": "0000000000000000000000000000000000000000",
        "gitTreeState": "clean",
        "buildDate": "2025-01-01T00:00:00Z",
        "goVersion": "go1.22.0",
        "compiler": "gc",
        "platform": "linux/amd64"
    })
    .to_string()
}

/// Status failure body like the API server returns on errors
pub fn status_json(code: u16, message: &str) -> String {
    let reason = match code {
        404 => "NotFound",
        503 => "ServiceUnavailable",
        _ => "InternalError",
    };
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}
