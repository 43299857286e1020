//! # argocd-inventory
//!
//! Binary entry point: parse flags, install logging, run one report and map
//! the outcome to the process exit status.

use anyhow::{anyhow, Context, Result};
use argocd_inventory::cli::Cli;
use argocd_inventory::config::ReportConfig;
use argocd_inventory::observability::init_logging;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Must happen before any reqwest client is built
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        return Err(anyhow!("failed to install rustls crypto provider"));
    }

    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format).context("failed to initialize logging")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("BUILD_GIT_HASH"),
        built = env!("BUILD_DATETIME"),
        "argocd-inventory starting"
    );

    let outcome = match ReportConfig::from_settings(cli.settings()) {
        Ok(config) => argocd_inventory::run(&config).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(summary) => {
            info!(
                rows = summary.rows_written,
                applications = summary.applications_reported,
                "inventory report complete"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "inventory report failed");
            Ok(ExitCode::FAILURE)
        }
    }
}
