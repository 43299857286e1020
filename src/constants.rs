//! # Constants
//!
//! Shared constants used throughout the reporter.
//!
//! Defaults here can be overridden via command-line flags or environment
//! variables where applicable.

/// Default output file for the report, truncated on every run
pub const DEFAULT_OUTPUT_PATH: &str = "report.csv";

/// Default log verbosity when neither `RUST_LOG` nor `--log-level` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Path segments of the session endpoint, relative to the controller base URL
pub const SESSION_PATH: [&str; 3] = ["api", "v1", "session"];

/// Path segments of the applications collection endpoint
pub const APPLICATIONS_PATH: [&str; 3] = ["api", "v1", "applications"];

/// Trailing path segment of the per-application resource tree endpoint
pub const RESOURCE_TREE_SEGMENT: &str = "resource-tree";

/// Health statuses admitted by the default health filter
pub const ADMITTED_HEALTH_STATUSES: [&str; 2] = ["Healthy", "Progressing"];

/// Leading columns shared by both name formats
pub const HEADER_PREFIX: [&str; 4] = ["Application", "Group", "Version", "Kind"];

/// Last header column when names are rendered bare
pub const HEADER_NAME_BARE: &str = "Name";

/// Last header column when names are rendered as `namespace/name`
pub const HEADER_NAME_NAMESPACED: &str = "Namespace/Name";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("argocd-inventory/", env!("CARGO_PKG_VERSION"));
