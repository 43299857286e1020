//! # CLI
//!
//! Command-line interface for the Argo CD inventory report.
//!
//! ## Usage
//!
//! ```bash
//! # Report every Healthy/Progressing application to report.csv
//! argocd-inventory --argo-url https://argocd.example.com \
//!     --argo-username admin --argo-password "$ARGOCD_PASSWORD"
//!
//! # Report every application regardless of health, bare resource names
//! argocd-inventory --health-filter false --name-format bare --out all.csv
//!
//! # Also warn about resources using APIs removed by Kubernetes 1.22
//! argocd-inventory --kube-version 1.22
//! ```
//!
//! Every flag can also be supplied through its `ARGOCD_*` environment variable.

use crate::config::{LoginPolicy, Settings};
use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_OUTPUT_PATH};
use crate::observability::LogFormat;
use crate::report::{HealthFilter, NameFormat};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_GIT_HASH"),
    ", built ",
    env!("BUILD_DATETIME"),
    ")"
);

/// Argo CD inventory report
#[derive(Parser, Debug)]
#[command(name = "argocd-inventory")]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Write one CSV row per resource managed by each Argo CD Application",
    long_about = None,
    after_help = "\
Examples:
  argocd-inventory --argo-url https://argocd.example.com --argo-username admin --argo-password secret
  argocd-inventory --health-filter false --name-format bare --out all.csv
"
)]
pub struct Cli {
    /// The Argo CD URL to use
    #[arg(long, env = "ARGOCD_URL")]
    pub argo_url: Option<String>,

    /// The Argo CD username to use
    #[arg(long, env = "ARGOCD_USERNAME")]
    pub argo_username: Option<String>,

    /// The Argo CD password to use
    #[arg(long, env = "ARGOCD_PASSWORD", hide_env_values = true)]
    pub argo_password: Option<String>,

    /// The output file to write the report to (truncated on every run)
    #[arg(long, env = "ARGOCD_REPORT_OUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub out: PathBuf,

    /// The log level to use (trace, debug, info, warn, error) or a tracing filter directive
    #[arg(long, env = "ARGOCD_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "ARGOCD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Only report applications whose health is Healthy or Progressing
    #[arg(
        long,
        env = "ARGOCD_HEALTH_FILTER",
        action = ArgAction::Set,
        default_value_t = true,
        value_name = "BOOL"
    )]
    pub health_filter: bool,

    /// How to render the resource name column
    #[arg(long, env = "ARGOCD_NAME_FORMAT", value_enum, default_value_t = NameFormatArg::Namespaced)]
    pub name_format: NameFormatArg,

    /// Treat a successful login response that carries an error, or no token, as a failure
    #[arg(
        long,
        env = "ARGOCD_STRICT_LOGIN",
        action = ArgAction::Set,
        default_value_t = true,
        value_name = "BOOL"
    )]
    pub strict_login: bool,

    /// Warn about resources using APIs deprecated or removed by this Kubernetes version (e.g. 1.22)
    #[arg(long, env = "ARGOCD_KUBE_VERSION")]
    pub kube_version: Option<String>,
}

/// Resource name column formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NameFormatArg {
    /// `namespace/name`
    Namespaced,
    /// `name`
    Bare,
}

impl From<NameFormatArg> for NameFormat {
    fn from(arg: NameFormatArg) -> Self {
        match arg {
            NameFormatArg::Namespaced => NameFormat::Namespaced,
            NameFormatArg::Bare => NameFormat::Bare,
        }
    }
}

impl Cli {
    /// Raw settings for `ReportConfig::from_settings`
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            argo_url: self.argo_url.clone(),
            argo_username: self.argo_username.clone(),
            argo_password: self.argo_password.clone(),
            output: self.out.clone(),
            health_filter: HealthFilter::from_enabled(self.health_filter),
            name_format: self.name_format.into(),
            login_policy: LoginPolicy::from_strict(self.strict_login),
            kube_version: self.kube_version.clone(),
        }
    }
}
