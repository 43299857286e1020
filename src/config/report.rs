//! # Report Configuration
//!
//! Raw settings come from the command line (or its environment fallbacks) and
//! are validated into a `ReportConfig` before any network call is attempted.

use crate::constants::DEFAULT_OUTPUT_PATH;
use crate::deprecations::KubeVersion;
use crate::error::{ReportError, Result};
use crate::report::{HealthFilter, NameFormat};
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use zeroize::Zeroizing;

/// How strictly a `200 OK` session response is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginPolicy {
    /// Reject a response that carries an `error` field or an empty token
    #[default]
    Strict,
    /// Take whatever `token` the response carries
    Lenient,
}

impl LoginPolicy {
    #[must_use]
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            LoginPolicy::Strict
        } else {
            LoginPolicy::Lenient
        }
    }
}

/// Username/password pair exchanged for a session token
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Password rendered as one `*` per character, safe to log
    #[must_use]
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.masked_password())
            .finish()
    }
}

/// Unvalidated settings as collected from flags and environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub argo_url: Option<String>,
    pub argo_username: Option<String>,
    pub argo_password: Option<String>,
    pub output: PathBuf,
    pub health_filter: HealthFilter,
    pub name_format: NameFormat,
    pub login_policy: LoginPolicy,
    pub kube_version: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            argo_url: None,
            argo_username: None,
            argo_password: None,
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            health_filter: HealthFilter::default(),
            name_format: NameFormat::default(),
            login_policy: LoginPolicy::default(),
            kube_version: None,
        }
    }
}

/// Validated configuration for one report run
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub base_url: Url,
    pub credentials: Credentials,
    pub output: PathBuf,
    pub health_filter: HealthFilter,
    pub name_format: NameFormat,
    pub login_policy: LoginPolicy,
    pub kube_version: Option<KubeVersion>,
}

impl ReportConfig {
    /// Validate raw settings
    ///
    /// # Errors
    /// Returns `ReportError::Config` naming the first missing or invalid flag
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let raw_url = required(settings.argo_url, "argo-url")?;
        let username = required(settings.argo_username, "argo-username")?;
        let password = required(settings.argo_password, "argo-password")?;

        let base_url = parse_base_url(&raw_url)?;

        if settings.output.as_os_str().is_empty() {
            return Err(ReportError::Config("out must not be empty".to_string()));
        }

        let kube_version = settings
            .kube_version
            .filter(|v| !v.trim().is_empty())
            .map(|v| {
                v.parse::<KubeVersion>()
                    .map_err(|e| ReportError::Config(format!("kube-version: {e}")))
            })
            .transpose()?;

        Ok(Self {
            base_url,
            credentials: Credentials::new(username, password),
            output: settings.output,
            health_filter: settings.health_filter,
            name_format: settings.name_format,
            login_policy: settings.login_policy,
            kube_version,
        })
    }
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ReportError::Config(format!("{flag} flag was not set"))),
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ReportError::Config(format!("argo-url '{raw}' is not a valid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ReportError::Config(format!(
            "argo-url '{raw}' must be an http or https URL"
        )));
    }

    Ok(url)
}
