//! # Errors
//!
//! Error taxonomy for a report run. Every variant is fatal: nothing is retried
//! and nothing is swallowed, so each message carries enough context (operation,
//! application, status code) to diagnose a failure from the log alone.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T, E = ReportError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Missing or invalid settings, detected before any network call
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Connection could not be established or the response could not be read
    #[error("transport error while {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Session creation was refused
    #[error("authentication failed: {}", describe_auth(.status, .message))]
    Auth {
        status: Option<u16>,
        message: Option<String>,
    },

    /// Any non-200 response from the applications or resource tree endpoints
    #[error(
        "invalid status code received while {operation}{}: {status}{}",
        for_application(.application),
        server_message(.message)
    )]
    HttpStatus {
        operation: &'static str,
        application: Option<String>,
        status: u16,
        message: Option<String>,
    },

    /// Response body was not the JSON shape we expect
    #[error("failed to decode response while {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Output file could not be opened, written or flushed
    #[error("failed to write report {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[allow(clippy::ref_option, reason = "called from the thiserror display attribute")]
fn describe_auth(status: &Option<u16>, message: &Option<String>) -> String {
    match (status, message) {
        (Some(status), Some(message)) => {
            format!("invalid status code received while logging into argocd: {status} ({message})")
        }
        (Some(status), None) => {
            format!("invalid status code received while logging into argocd: {status}")
        }
        (None, Some(message)) => format!("argocd rejected the session: {message}"),
        (None, None) => "argocd rejected the session".to_string(),
    }
}

#[allow(clippy::ref_option, reason = "called from the thiserror display attribute")]
fn for_application(application: &Option<String>) -> String {
    application
        .as_deref()
        .map(|app| format!(" for application {app}"))
        .unwrap_or_default()
}

#[allow(clippy::ref_option, reason = "called from the thiserror display attribute")]
fn server_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|msg| format!(" ({msg})"))
        .unwrap_or_default()
}

impl ReportError {
    /// HTTP status code carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ReportError::Auth { status, .. } => *status,
            ReportError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
