//! Bayesian coin flip common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - The error taxonomy (invalid parameters, undefined statistics, config, I/O)
//! - Output format selection for CLI commands
//! - Report schema versioning

pub mod error;
pub mod output;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;

/// Schema version for JSON reports emitted by the CLI.
pub const SCHEMA_VERSION: &str = "1.0.0";
