//! Command-line argument definitions for utilkit
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{CsvOptions, LogFormat, LoggingConfig};
use crate::constants::DEFAULT_BUFFER_SIZE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the utilkit CSV tools
#[derive(Debug, Clone, Parser)]
#[command(
    name = "utilkit",
    version,
    about = "Merge and validate CSV files",
    long_about = "Concatenates CSV files that share one column layout into a single file, \
                  and checks CSV files for malformed rows and inconsistent column counts \
                  before merging."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides progress spinners.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Encoding of log events written to stderr
    #[arg(
        long = "log-format",
        value_enum,
        global = true,
        default_value = "compact",
        help = "Log event format"
    )]
    pub log_format: LogFormat,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Concatenate CSV files with the same column count into one file
    Merge(MergeArgs),
    /// Report malformed rows and column counts of CSV files
    Validate(ValidateArgs),
}

/// Arguments for the merge command
#[derive(Debug, Clone, Parser)]
pub struct MergeArgs {
    /// Destination file, created or truncated
    ///
    /// Parent directories are created when missing.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output CSV file"
    )]
    pub output: PathBuf,

    /// Treat the first row of every input as a header
    ///
    /// Only the first input's header is written to the output.
    #[arg(long = "header", help = "Inputs start with a header row")]
    pub header: bool,

    /// Input files or glob patterns, merged in the order given
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    pub inputs: Vec<String>,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Treat the first row of every input as a header
    #[arg(long = "header", help = "Inputs start with a header row")]
    pub header: bool,

    /// Read buffer size in bytes
    #[arg(
        long = "buffer-size",
        value_name = "BYTES",
        default_value_t = DEFAULT_BUFFER_SIZE,
        help = "Read buffer size in bytes"
    )]
    pub buffer_size: usize,

    /// Maximum number of row errors printed per file
    #[arg(
        long = "max-errors",
        value_name = "COUNT",
        default_value = "20",
        help = "Maximum row errors printed per file"
    )]
    pub max_errors: usize,

    /// Input files or glob patterns
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    pub inputs: Vec<String>,
}

impl Args {
    /// Logging configuration derived from the verbosity flags
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_verbosity(self.verbose, self.quiet, self.log_format)
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ValidateArgs {
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            has_header: self.header,
            buffer_size: self.buffer_size,
        }
    }
}
