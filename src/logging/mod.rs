//! Logging and observability
//!
//! Structured logging via the `tracing` crate: console output for
//! development, optional rolling JSON files for deployments.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
