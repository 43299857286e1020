//! # Logging
//!
//! Installs the global `tracing` subscriber.
//!
//! The filter is taken from `RUST_LOG` when it is set and valid. Otherwise the
//! `--log-level` value is used, either a bare level (`debug`) or a full filter
//! directive (`argocd_inventory=debug,reqwest=warn`). An unrecognised level
//! falls back to `info` and is reported once the subscriber is running.

use crate::constants::DEFAULT_LOG_LEVEL;
use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Log output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Initialize the global subscriber
///
/// # Errors
/// Returns an error if a global subscriber was already installed
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let (filter, rejected) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(_) => filter_for_level(level),
    };

    let installed = match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_current_span(true)
            .with_env_filter(filter)
            .try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    if let Some(rejected) = rejected {
        warn!(
            "invalid log level '{}', falling back to '{}'",
            rejected, DEFAULT_LOG_LEVEL
        );
    }

    Ok(())
}

/// Build a filter from a `--log-level` value, returning the value itself when it was rejected
fn filter_for_level(level: &str) -> (EnvFilter, Option<String>) {
    let level = level.trim();

    if level.parse::<LevelFilter>().is_ok() {
        return (EnvFilter::new(level), None);
    }

    // Anything else must look like a directive list, otherwise a typo such as
    // "verbose" would silently become a target filter
    if level.contains('=') || level.contains(',') {
        if let Ok(filter) = EnvFilter::try_new(level) {
            return (filter, None);
        }
    }

    (EnvFilter::new(DEFAULT_LOG_LEVEL), Some(level.to_string()))
}
