//! Error handling for utilkit operations.
//!
//! Provides the crate-wide error enum with context for file reading,
//! CSV merging, signal registration and logging setup failures.

use crate::csvio::CsvError;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error used for caller-supplied callback failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    /// CSV iteration, conversion or output failure
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("could not open file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("merge requires at least one input file")]
    NoInputFiles,

    #[error("input file {} contains no records", path.display())]
    EmptyInput { path: PathBuf },

    #[error(
        "column count mismatch in {}: expected {expected} columns, found {found}",
        path.display()
    )]
    ColumnCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("failed to register signal handler: {source}")]
    SignalRegistration {
        #[source]
        source: std::io::Error,
    },

    #[error("Logging setup failed: {message}")]
    Logging { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn empty_input(path: impl Into<PathBuf>) -> Self {
        Self::EmptyInput { path: path.into() }
    }

    pub fn column_count_mismatch(path: impl Into<PathBuf>, expected: usize, found: usize) -> Self {
        Self::ColumnCountMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create a logging setup error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
