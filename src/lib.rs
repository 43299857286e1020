//! # Argo CD Inventory
//!
//! Logs into an Argo CD controller, lists its Applications and writes one CSV
//! row per resource each Application manages.
//!
//! ## Overview
//!
//! A run is a fixed pipeline:
//!
//! 1. **Authenticate** - exchange a username/password for a session token
//! 2. **Enumerate** - list every Application visible to that session
//! 3. **Filter** - keep only Applications whose health is `Healthy` or `Progressing`
//!    (optional)
//! 4. **Report** - fetch each kept Application's resource tree and write one row per node
//!
//! The output file is truncated and its header written before enumeration
//! starts. The first failure aborts the run, leaving every row written so far
//! in the file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use argocd_inventory::config::{ReportConfig, Settings};
//!
//! # async fn example() -> argocd_inventory::error::Result<()> {
//! let config = ReportConfig::from_settings(Settings {
//!     argo_url: Some("https://argocd.example.com".to_string()),
//!     argo_username: Some("admin".to_string()),
//!     argo_password: Some("secret".to_string()),
//!     ..Settings::default()
//! })?;
//! let summary = argocd_inventory::run(&config).await?;
//! println!("{} rows written", summary.rows_written);
//! # Ok(())
//! # }
//! ```

pub mod argocd;
pub mod cli;
pub mod config;
pub mod constants;
pub mod deprecations;
pub mod error;
pub mod observability;
pub mod report;

use crate::argocd::ArgoClient;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::report::{Reporter, RunSummary};
use tracing::info;

/// Authenticate and produce one report as described by `config`
///
/// # Errors
/// Returns the first `ReportError` raised by authentication, enumeration or the sink
pub async fn run(config: &ReportConfig) -> Result<RunSummary> {
    info!(
        url = %config.base_url,
        user = %config.credentials.username,
        out = %config.output.display(),
        health_filter = ?config.health_filter,
        name_format = ?config.name_format,
        "starting inventory report"
    );

    let session = ArgoClient::new(config.base_url.clone())?
        .login(&config.credentials, config.login_policy)
        .await?;

    Reporter::new(session, config.output.clone())
        .with_health_filter(config.health_filter)
        .with_name_format(config.name_format)
        .with_kube_version(config.kube_version)
        .run()
        .await
}
