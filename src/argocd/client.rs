//! # Argo CD REST Client
//!
//! Native REST implementation of the three Argo CD API calls the report needs.
//!
//! Authentication is two-phase: an unauthenticated `ArgoClient` is turned into
//! a `Session` by `ArgoClient::login`, and only a `Session` can issue the
//! bearer-authenticated calls. The token is never refreshed; if it expires
//! mid-run the next call fails with a non-200 status.
//!
//! Every call treats `200 OK` as the only success code. Redirect following is
//! disabled so a `3xx` is reported rather than silently chased.

use crate::argocd::types::{
    ApiErrorResponse, ApplicationList, ResourceTree, SessionRequest, SessionResponse,
};
use crate::config::{Credentials, LoginPolicy};
use crate::constants::{APPLICATIONS_PATH, RESOURCE_TREE_SEGMENT, SESSION_PATH, USER_AGENT};
use crate::error::{ReportError, Result};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info_span, warn, Instrument};

const OP_LOGIN: &str = "logging into argocd";
const OP_LIST_APPLICATIONS: &str = "fetching applications";
const OP_RESOURCE_TREE: &str = "fetching resource tree";

/// Unauthenticated Argo CD client
pub struct ArgoClient {
    http_client: Client,
    base_url: Url,
}

impl std::fmt::Debug for ArgoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgoClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ArgoClient {
    /// Create a new client for the controller at `base_url`
    ///
    /// # Errors
    /// Returns `ReportError::Transport` if the HTTP client cannot be built
    pub fn new(base_url: Url) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|source| ReportError::Transport {
                operation: "creating the HTTP client",
                source,
            })?;

        debug!(url = %base_url, "creating new argocd client");

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Exchange credentials for a bearer token
    ///
    /// # Errors
    /// - `ReportError::Transport` if the request cannot be sent or the body read
    /// - `ReportError::Auth` on any status other than `200`, or when the strict
    ///   policy finds an `error` field or an empty token in a `200` response
    /// - `ReportError::Decode` if the body is not the expected JSON shape
    pub async fn login(self, credentials: &Credentials, policy: LoginPolicy) -> Result<Session> {
        let url = endpoint(&self.base_url, SESSION_PATH);
        let span = info_span!("argocd.session.create", url = %url, user = %credentials.username);

        async move {
            debug!(
                password = %credentials.masked_password(),
                "sending login request"
            );

            let response = self
                .http_client
                .post(url.clone())
                .json(&SessionRequest {
                    username: &credentials.username,
                    password: credentials.password(),
                })
                .send()
                .await
                .map_err(|source| ReportError::Transport {
                    operation: OP_LOGIN,
                    source,
                })?;

            debug!(status = %response.status(), "received response from argocd");
            let status = response.status();
            if status != StatusCode::OK {
                return Err(ReportError::Auth {
                    status: Some(status.as_u16()),
                    message: error_message(response).await,
                });
            }

            let body = read_body(response, OP_LOGIN).await?;
            let session: SessionResponse = decode(&body, OP_LOGIN)?;
            check_session_response(&session, policy)?;

            debug!("logged into argocd");
            Ok(Session {
                http_client: self.http_client,
                base_url: self.base_url,
                token: session.token,
            })
        }
        .instrument(span)
        .await
    }
}

/// Apply the login policy to a `200 OK` session response
fn check_session_response(session: &SessionResponse, policy: LoginPolicy) -> Result<()> {
    if !session.error.is_empty() || session.code != 0 {
        let message = [&session.message, &session.error]
            .into_iter()
            .find(|m| !m.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("error code {}", session.code));

        match policy {
            LoginPolicy::Strict => {
                return Err(ReportError::Auth {
                    status: None,
                    message: Some(message),
                })
            }
            LoginPolicy::Lenient => {
                warn!(error = %message, "session response carries an error, continuing with its token");
            }
        }
    }

    if session.token.is_empty() {
        match policy {
            LoginPolicy::Strict => {
                return Err(ReportError::Auth {
                    status: None,
                    message: Some("session response did not contain a token".to_string()),
                })
            }
            LoginPolicy::Lenient => warn!("session response did not contain a token"),
        }
    }

    Ok(())
}

/// Authenticated Argo CD session
///
/// Holds the bearer token for the remainder of the run.
pub struct Session {
    http_client: Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Fetch every application the controller reports, in server order
    ///
    /// A single response page is treated as the complete inventory.
    ///
    /// # Errors
    /// `Transport`, `HttpStatus` or `Decode` as described on `ReportError`
    pub async fn list_applications(&self) -> Result<ApplicationList> {
        let url = endpoint(&self.base_url, APPLICATIONS_PATH);
        let span = info_span!("argocd.applications.list", url = %url);

        async move {
            let list: ApplicationList = self.get_json(url, OP_LIST_APPLICATIONS, None).await?;

            if list.metadata.has_more() {
                warn!(
                    items = list.items.len(),
                    remaining = list.metadata.remaining_item_count,
                    "argocd reported more applications than returned; only the first page is reported"
                );
            }

            debug!(items = list.items.len(), "fetched applications");
            Ok(list)
        }
        .instrument(span)
        .await
    }

    /// Fetch the live resource tree of one application
    ///
    /// # Errors
    /// `Transport`, `HttpStatus` (naming `application`) or `Decode`
    pub async fn resource_tree(&self, application: &str) -> Result<ResourceTree> {
        let url = endpoint(
            &self.base_url,
            APPLICATIONS_PATH
                .into_iter()
                .chain([application, RESOURCE_TREE_SEGMENT]),
        );
        let span = info_span!("argocd.application.resource_tree", app = %application);

        async move {
            let tree: ResourceTree = self
                .get_json(url, OP_RESOURCE_TREE, Some(application))
                .await?;
            debug!(
                nodes = tree.nodes.len(),
                orphaned = tree.orphaned_nodes.len(),
                "fetched resource tree"
            );
            Ok(tree)
        }
        .instrument(span)
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        operation: &'static str,
        application: Option<&str>,
    ) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| ReportError::Transport { operation, source })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ReportError::HttpStatus {
                operation,
                application: application.map(str::to_string),
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let body = read_body(response, operation).await?;
        decode(&body, operation)
    }
}

/// Append percent-encoded path segments to the base URL, keeping any path prefix
fn endpoint<'a>(base_url: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base_url.clone();
    // Base URLs are validated as http(s) in config, which always have a path
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Best-effort message from a non-200 response; an unreadable body yields `None`
async fn error_message(response: reqwest::Response) -> Option<String> {
    let body = response.bytes().await.ok()?;
    ApiErrorResponse::message_from(&body)
}

async fn read_body(response: reqwest::Response, operation: &'static str) -> Result<Vec<u8>> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|source| ReportError::Transport { operation, source })
}

fn decode<T: DeserializeOwned>(body: &[u8], operation: &'static str) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| ReportError::Decode { operation, source })
}
