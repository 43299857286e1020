//! # Observability
//!
//! Structured logging for the report run.
//!
//! - `logging`: tracing subscriber setup (text or JSON, `RUST_LOG` aware)

pub mod logging;

pub use logging::{init_logging, LogFormat};
