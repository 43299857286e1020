//! Common test utilities for Pact integration tests
//!
//! Provides rustls setup plus helpers for registering the Argo CD
//! interactions most tests share.

#![allow(dead_code, reason = "each test binary uses a different subset of helpers")]

use argocd_inventory::config::{ReportConfig, Settings};
use pact_consumer::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Once;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "password";
pub const TOKEN: &str = "abc123";
pub const BEARER: &str = "Bearer abc123";

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` to ensure it's only called once per test binary.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        // A provider may already be installed by another crate in the process
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Mock server URL without its trailing slash
pub fn base_url(mock_server: &dyn ValidatingMockServer) -> String {
    let mut base_url = mock_server.url().to_string();
    if base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

/// Settings pointing at `base_url` with the shared credentials
pub fn settings(base_url: &str, out: &Path) -> Settings {
    Settings {
        argo_url: Some(base_url.to_string()),
        argo_username: Some(USERNAME.to_string()),
        argo_password: Some(PASSWORD.to_string()),
        output: out.to_path_buf(),
        ..Settings::default()
    }
}

pub fn config(base_url: &str, out: &Path) -> ReportConfig {
    ReportConfig::from_settings(settings(base_url, out)).unwrap()
}

/// Register a successful login under `prefix` (empty for the server root)
pub fn login_ok(pact_builder: &mut PactBuilder, prefix: &str) {
    let path = format!("{prefix}/api/v1/session");
    pact_builder.interaction("create a session with valid credentials", "", |mut i| {
        i.given("an admin account exists");
        i.request
            .method("POST")
            .path(path)
            .json_body(json!({
                "username": USERNAME,
                "password": PASSWORD
            }));
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "token": TOKEN }));
        i
    });
}

/// Register the application list response
pub fn applications(pact_builder: &mut PactBuilder, items: Value) {
    pact_builder.interaction("list applications", "", |mut i| {
        i.given("applications exist");
        i.request
            .method("GET")
            .path("/api/v1/applications")
            .header("authorization", BEARER);
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "metadata": { "resourceVersion": "1234" },
                "items": items
            }));
        i
    });
}

/// Register the resource tree response for `app`
pub fn resource_tree(pact_builder: &mut PactBuilder, app: &str, nodes: Value) {
    let path = format!("/api/v1/applications/{app}/resource-tree");
    let description = format!("get the resource tree of {app}");
    pact_builder.interaction(description.as_str(), "", |mut i| {
        i.given(format!("application {app} exists"));
        i.request
            .method("GET")
            .path(path)
            .header("authorization", BEARER);
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "nodes": nodes }));
        i
    });
}

/// Register a non-200 response for `path`
pub fn failure(pact_builder: &mut PactBuilder, path: &str, status: u16, message: &str) {
    let path = path.to_string();
    let description = format!("{path} fails with {status}");
    let message = message.to_string();
    pact_builder.interaction(description.as_str(), "", |mut i| {
        i.given("the controller is failing");
        i.request
            .method("GET")
            .path(path)
            .header("authorization", BEARER);
        i.response
            .status(status)
            .header("content-type", "application/json")
            .json_body(json!({
                "error": message,
                "code": 2,
                "message": message
            }));
        i
    });
}

/// Register a `200 OK` whose body is not JSON for `path`
pub fn malformed(pact_builder: &mut PactBuilder, path: &str) {
    let path = path.to_string();
    let description = format!("{path} returns an html page");
    pact_builder.interaction(description.as_str(), "", |mut i| {
        i.given("a proxy answers in front of the controller");
        i.request
            .method("GET")
            .path(path)
            .header("authorization", BEARER);
        i.response
            .status(200)
            .header("content-type", "text/html")
            .body("<html><body>maintenance</body></html>");
        i
    });
}

pub fn application(name: &str, health: &str) -> Value {
    json!({
        "metadata": { "name": name, "namespace": "argocd" },
        "status": { "health": { "status": health } }
    })
}

pub fn node(group: &str, version: &str, kind: &str, namespace: &str, name: &str) -> Value {
    json!({
        "group": group,
        "version": version,
        "kind": kind,
        "namespace": namespace,
        "name": name,
        "uid": "00000000-0000-0000-0000-000000000000"
    })
}
