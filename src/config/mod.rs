//! # Configuration
//!
//! Run configuration, built once at startup and handed to the client and the
//! reporter by value.
//!
//! - `report`: validated `ReportConfig` and the `Credentials` it carries

mod report;

pub use report::{Credentials, LoginPolicy, ReportConfig, Settings};
