//! utilkit library
//!
//! Small, independent file and process utilities:
//! - Lazy CSV record iteration with typed conversion and line-tagged errors
//! - A typed CSV writer and a merge routine for same-shape CSV files
//! - Whole-file reading and lazy line iteration
//! - Signal-aware cancellation tokens
//! - ISO-8601 date formatting
//! - Structured logging setup and elapsed-time events
//! - Struct field metadata through serde

pub mod config;
pub mod constants;
pub mod csvio;
pub mod dates;
pub mod errfmt;
pub mod error;
pub mod fileio;
pub mod introspect;
pub mod logging;
#[cfg(unix)]
pub mod signal;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

pub use error::{BoxError, Error, Result};
