//! # Wire Types
//!
//! Argo CD REST API request/response structures.
//!
//! Only the handful of fields the report consumes are modelled. Unknown fields
//! are ignored, and missing or `null` fields decode to their zero value, so
//! newer controller versions keep working without changes here.
//!
//! API Reference: <https://argo-cd.readthedocs.io/en/stable/developer-guide/api-docs/>

use serde::{Deserialize, Deserializer, Serialize};

/// Decode a missing or `null` value as `T::default()`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============================================================================
// Session
// ============================================================================

/// Request body for `POST /api/v1/session`
#[derive(Debug, Serialize)]
pub struct SessionRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from `POST /api/v1/session`
///
/// `error`, `code` and `message` follow the gRPC gateway error envelope; a
/// well-behaved controller only fills them on non-200 responses.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct SessionResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

impl std::fmt::Debug for SessionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResponse")
            .field("token_len", &self.token.len())
            .field("error", &self.error)
            .field("code", &self.code)
            .field("message", &self.message)
            .finish()
    }
}

/// Error envelope returned by the API gateway on failures
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

impl ApiErrorResponse {
    /// Best human-readable message from a response body, if the body is an error envelope
    #[must_use]
    pub fn message_from(body: &[u8]) -> Option<String> {
        let envelope: Self = serde_json::from_slice(body).ok()?;
        [envelope.message, envelope.error]
            .into_iter()
            .find(|m| !m.is_empty())
    }
}

// ============================================================================
// Applications
// ============================================================================

/// Response from `GET /api/v1/applications`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationList {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Application>,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: ListMeta,
}

/// Kubernetes list metadata; only the pagination hints are read
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(rename = "continue", deserialize_with = "null_as_default")]
    pub continue_token: String,
    pub remaining_item_count: Option<i64>,
}

impl ListMeta {
    /// Whether the server signalled that more items exist beyond this page
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.continue_token.is_empty() || self.remaining_item_count.is_some_and(|n| n > 0)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Application {
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: ObjectMeta,
    #[serde(deserialize_with = "null_as_default")]
    pub status: ApplicationStatus,
}

impl Application {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Health status string as reported by the controller, empty when absent
    #[must_use]
    pub fn health_status(&self) -> &str {
        &self.status.health.status
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub namespace: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub health: HealthStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

// ============================================================================
// Resource tree
// ============================================================================

/// Response from `GET /api/v1/applications/{name}/resource-tree`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceTree {
    /// Live objects owned by the application
    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<ResourceNode>,
    /// Objects in the application's namespaces that it does not own
    #[serde(deserialize_with = "null_as_default")]
    pub orphaned_nodes: Vec<ResourceNode>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResourceNode {
    #[serde(deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub namespace: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_list_ignores_unknown_fields() {
        let body = json!({
            "items": [{
                "metadata": {
                    "name": "guestbook",
                    "namespace": "argocd",
                    "labels": {"team": "web"},
                    "creationTimestamp": "2024-01-01T00:00:00Z"
                },
                "spec": {"project": "default"},
                "status": {
                    "health": {"status": "Healthy", "message": "ok"},
                    "sync": {"status": "Synced"}
                }
            }],
            "metadata": {"resourceVersion": "123"}
        });

        let list: ApplicationList = serde_json::from_value(body).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name(), "guestbook");
        assert_eq!(list.items[0].health_status(), "Healthy");
        assert!(!list.metadata.has_more());
    }

    #[test]
    fn test_application_missing_status_decodes_empty() {
        let list: ApplicationList = serde_json::from_value(json!({
            "items": [{"metadata": {"name": "bare"}}, {"metadata": {"name": "nulls"}, "status": null}]
        }))
        .unwrap();
        assert_eq!(list.items[0].health_status(), "");
        assert_eq!(list.items[1].health_status(), "");
    }

    #[test]
    fn test_null_items_decode_as_empty() {
        let list: ApplicationList =
            serde_json::from_value(json!({"items": null, "metadata": {}})).unwrap();
        assert!(list.items.is_empty());

        let list: ApplicationList = serde_json::from_value(json!({})).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_list_meta_pagination_hints() {
        let meta: ListMeta = serde_json::from_value(json!({"continue": "abc"})).unwrap();
        assert!(meta.has_more());

        let meta: ListMeta = serde_json::from_value(json!({"remainingItemCount": 4})).unwrap();
        assert!(meta.has_more());

        let meta: ListMeta = serde_json::from_value(json!({"remainingItemCount": 0})).unwrap();
        assert!(!meta.has_more());
    }

    #[test]
    fn test_resource_node_missing_fields_default_to_empty() {
        let tree: ResourceTree = serde_json::from_value(json!({
            "nodes": [
                {"kind": "Namespace", "name": "web", "version": "v1", "uid": "1234"},
                {"group": null, "version": "v1", "kind": "Service", "name": "ui", "namespace": "web"}
            ],
            "hosts": []
        }))
        .unwrap();

        assert_eq!(
            tree.nodes[0],
            ResourceNode {
                group: String::new(),
                version: "v1".to_string(),
                kind: "Namespace".to_string(),
                name: "web".to_string(),
                namespace: String::new(),
            }
        );
        assert_eq!(tree.nodes[1].group, "");
        assert!(tree.orphaned_nodes.is_empty());
    }

    #[test]
    fn test_session_response_and_error_envelope() {
        let response: SessionResponse =
            serde_json::from_value(json!({"token": "abc123"})).unwrap();
        assert_eq!(response.token, "abc123");
        assert!(response.error.is_empty());
        assert!(!format!("{response:?}").contains("abc123"));

        let body = br#"{"error":"invalid username or password","code":16,"message":"invalid username or password"}"#;
        assert_eq!(
            ApiErrorResponse::message_from(body).as_deref(),
            Some("invalid username or password")
        );
        assert_eq!(ApiErrorResponse::message_from(b"<html>502</html>"), None);
        assert_eq!(ApiErrorResponse::message_from(b"{}"), None);
    }

    #[test]
    fn test_wrong_shape_is_a_decode_error() {
        assert!(serde_json::from_value::<ApplicationList>(json!({"items": "nope"})).is_err());
        assert!(serde_json::from_value::<ResourceTree>(json!([1, 2, 3])).is_err());
    }
}
