//! Pact contract tests for the Argo CD REST API
//!
//! These tests define the contract between argocd-inventory and the three
//! Argo CD endpoints it calls: session creation, application listing and the
//! per-application resource tree.

#[cfg(test)]
mod common;

use argocd_inventory::argocd::ArgoClient;
use argocd_inventory::config::{Credentials, LoginPolicy};
use argocd_inventory::error::ReportError;
use common::{init_rustls, BEARER, PASSWORD, TOKEN, USERNAME};
use pact_consumer::prelude::*;
use reqwest::Url;
use serde_json::json;

fn client(base_url: &str) -> ArgoClient {
    ArgoClient::new(Url::parse(base_url).unwrap()).unwrap()
}

fn credentials() -> Credentials {
    Credentials::new(USERNAME, PASSWORD)
}

#[tokio::test]
async fn test_create_session_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("argocd-inventory", "ArgoCD-API");
    common::login_ok(&mut pact_builder, "");

    let mock_server = pact_builder.start_mock_server(None, None);
    let base_url = common::base_url(mock_server.as_ref());

    let session = client(&base_url)
        .login(&credentials(), LoginPolicy::Strict)
        .await
        .expect("login should succeed");

    let debug = format!("{session:?}");
    assert!(!debug.contains(TOKEN), "session debug output leaks the token");
}

#[tokio::test]
async fn test_create_session_under_path_prefix() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("argocd-inventory", "ArgoCD-API");
    common::login_ok(&mut pact_builder, "/argocd");

    let mock_server = pact_builder.start_mock_server(None, None);
    let base_url = format!("{}/argocd", common::base_url(mock_server.as_ref()));

    let result = client(&base_url)
        .login(&credentials(), LoginPolicy::Strict)
        .await;
    assert!(result.is_ok(), "login under a path prefix failed: {result:?}");
}

#[tokio::test]
async fn test_create_session_unauthorized() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("argocd-inventory", "ArgoCD-API");
    pact_builder.interaction("create a session with wrong credentials", "", |mut i| {
        i.given("an admin account exists");
        i.request
            .method("POST")
            .path("/api/v1/session")
            .json_body(json!({
                "username": USERNAME,
                "password": "wrong"
            }));
        i.response
            .status(401)
            .header("content-type", "application/json")
            .json_body(json!({
                "error": "Invalid username or password",
                "code": 16,
                "message": "Invalid username or password"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let base_url = common::base_url(mock_server.as_ref());

    let err = client(&base_url)
        .login(&Credentials::new(USERNAME, "wrong"), LoginPolicy::Strict)
        .await
        .expect_err("login should be refused");

    match &err {
        ReportError::Auth { status, message } => {
            assert_eq!(*status, Some(401));
            assert_eq!(message.as_deref(), Some("Invalid username or password"));
        }
        other => panic!("expected auth error, got {other:?}"),
    }
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_create_session_error_field_with_ok_status() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("argocd-inventory", "ArgoCD-API");
    pact_builder.interaction("create a session that reports an error", "", |mut i| {
        i.given("the account is locked");
        i.request
            .method("POST")
            .path("/api/v1/session")
            .json_body(json!({
                "username": USERNAME,
                "password": PASSWORD
            }));
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "token": "",
                "error": "account is disabled",
                "code": 7
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let base_url = common::base_url(mock_server.as_ref());

    let err = client(&base_url)
        .login(&credentials(), LoginPolicy::Strict)
        .await
        .expect_err("strict login should reject the error field");

    assert!(matches!(err, ReportError::Auth { status: None, .. }));
    assert!(err.to_string().contains("account is disabled"));
}

#[tokio::test]
async fn test_create_session_malformed_body() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("argocd-inventory", "ArgoCD-API");
    pact_builder.interaction("create a session behind a misbehaving proxy", "", |mut i| {
        i.given("a proxy answers in front of the controller");
        i.request
            .method("POST")
            .path("/api/v1/session")
            .json_body(json!({
                "username": USERNAME,
                "password": PASSWORD
            }));
        i.response
            .status(200)
            .header("content-type", "text/html")
            .body("<html><body>maintenance</body></html>");
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let base_url = common::base_url(mock_server.as_ref());

    let err = client(&base_url)
        .login(&credentials(), LoginPolicy::Strict)
        .await
        .expect_err("an html body is not a session");

    assert!(
        matches!(err, ReportError::Decode { .. }),
        "expected decode error, got {err:?}"
    );
}

#[tokio::test]
async fn test_list_applications_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("argocd-inventory", "ArgoCD-API");
    common::login_ok(&mut pact_builder, "");
    pact_builder.interaction("list applications", "", |mut i| {
        i.given("three applications exist");
        i.request
            .method("GET")
            .path("/api/v1/applications")
            .header("authorization", BEARER);
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "metadata": { "resourceVersion": "42" },
                "items": [
                    {
                        "metadata": { "name": "guestbook", "namespace": "argocd", "uid": "1" },
                        "spec": { "project": "default" },
                        "status": {
                            "health": { "status": "Healthy" },
                            "sync": { "status": "Synced" }
                        }
                    },
                    {
                        "metadata": { "name": "broken" },
                        "status": { "health": null }
                    },
                    {
                        "metadata": { "name": "fresh" }
                    }
                ]
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let base_url = common::base_url(mock_server.as_ref());

    let session = client(&base_url)
        .login(&credentials(), LoginPolicy::Strict)
        .await
        .unwrap();
    let list = session.list_applications().await.unwrap();

    let names: Vec<_> = list.items.iter().map(|a| a.name()).collect();
    assert_eq!(names, ["guestbook", "broken", "fresh"]);

    let health: Vec<_> = list.items.iter().map(|a| a.health_status()).collect();
    assert_eq!(health, ["Healthy", "", ""]);
    assert!(!list.metadata.has_more());
}

#[tokio::test]
async fn test_resource_tree_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("argocd-inventory", "ArgoCD-API");
    common::login_ok(&mut pact_builder, "");
    pact_builder.interaction("get the resource tree of guestbook", "", |mut i| {
        i.given("application guestbook exists");
        i.request
            .method("GET")
            .path("/api/v1/applications/guestbook/resource-tree")
            .header("authorization", BEARER);
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "nodes": [
                    common::node("apps", "v1", "Deployment", "default", "guestbook-ui"),
                    {
                        "version": "v1",
                        "kind": "Service",
                        "namespace": "default",
                        "name": "guestbook-ui",
                        "group": null,
                        "health": { "status": "Healthy" }
                    }
                ],
                "orphanedNodes": [
                    common::node("", "v1", "ConfigMap", "default", "leftover")
                ]
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let base_url = common::base_url(mock_server.as_ref());

    let session = client(&base_url)
        .login(&credentials(), LoginPolicy::Strict)
        .await
        .unwrap();
    let tree = session.resource_tree("guestbook").await.unwrap();

    assert_eq!(tree.nodes.len(), 2);
    assert_eq!(tree.nodes[0].kind, "Deployment");
    assert_eq!(tree.nodes[1].group, "");
    assert_eq!(tree.nodes[1].kind, "Service");
    assert_eq!(tree.orphaned_nodes.len(), 1);
}

#[tokio::test]
async fn test_resource_tree_not_found_names_application() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("argocd-inventory", "ArgoCD-API");
    common::login_ok(&mut pact_builder, "");
    common::failure(
        &mut pact_builder,
        "/api/v1/applications/ghost/resource-tree",
        404,
        "applications.argoproj.io \"ghost\" not found",
    );

    let mock_server = pact_builder.start_mock_server(None, None);
    let base_url = common::base_url(mock_server.as_ref());

    let session = client(&base_url)
        .login(&credentials(), LoginPolicy::Strict)
        .await
        .unwrap();
    let err = session
        .resource_tree("ghost")
        .await
        .expect_err("missing application should fail");

    match &err {
        ReportError::HttpStatus {
            application,
            status,
            ..
        } => {
            assert_eq!(application.as_deref(), Some("ghost"));
            assert_eq!(*status, 404);
        }
        other => panic!("expected status error, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("ghost"));
    assert!(message.contains("404"));
}
