//! # Report
//!
//! The inventory pipeline and its output.
//!
//! - `filter`: health-status filter
//! - `row`: row model and name formats
//! - `sink`: CSV file lifecycle
//! - `reporter`: enumerate, filter, fetch and emit

mod filter;
mod reporter;
mod row;
mod sink;

pub use filter::HealthFilter;
pub use reporter::{Reporter, RunSummary};
pub use row::{NameFormat, ReportRow};
pub use sink::CsvSink;
