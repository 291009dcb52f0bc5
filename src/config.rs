//! Configuration structures for logging and CSV handling.
//!
//! Both structures are plain serde types so that a hosting application can
//! embed them in its own configuration file, or build them from CLI flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_BUFFER_SIZE, LOG_TARGET};
use crate::error::{Error, Result};

/// Minimum severity of emitted log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(Error::configuration(format!("unknown log level '{}'", other))),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output encoding of log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    Compact,
}

/// Stream log events are written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub target: LogTarget,
    /// Let `RUST_LOG` override `level` when set
    pub respect_env: bool,
    /// Restrict events to this target prefix; `None` applies `level` globally
    pub target_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            target: LogTarget::Stdout,
            respect_env: true,
            target_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Build a stderr configuration from CLI verbosity flags
    ///
    /// `quiet` wins over `verbose`; no `-v` logs warnings and above.
    pub fn from_verbosity(verbose: u8, quiet: bool, format: LogFormat) -> Self {
        let level = if quiet {
            LogLevel::Error
        } else {
            match verbose {
                0 => LogLevel::Warn,
                1 => LogLevel::Info,
                2 => LogLevel::Debug,
                _ => LogLevel::Trace,
            }
        };

        Self {
            level,
            format,
            target: LogTarget::Stderr,
            respect_env: true,
            target_filter: Some(LOG_TARGET.to_string()),
        }
    }

    /// Filter directive used when `RUST_LOG` is not consulted
    pub fn filter_directive(&self) -> String {
        match &self.target_filter {
            Some(target) => format!("{}={}", target, self.level),
            None => self.level.to_string(),
        }
    }
}

/// Options for reading CSV sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Treat the first record of each file as a header
    pub has_header: bool,
    /// Read buffer size, raised to the default when smaller
    pub buffer_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
