//! Uniform CSV error values
//!
//! Every failure carries the file it came from, the 1-based line number when
//! one applies, and the underlying cause.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::BoxError;

/// Where in a CSV source an error occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    /// `None` for failures not tied to a record, such as opening the file
    pub line: Option<usize>,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, line: Option<usize>) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} line {}", self.path.display(), line),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum CsvError {
    /// Opening, reading or decoding the CSV source failed
    #[error("iteration error in {location}: {source}")]
    Iteration {
        location: Location,
        #[source]
        source: BoxError,
    },

    /// The caller's conversion function rejected a record
    #[error("conversion error in {location}: {source}")]
    Conversion {
        location: Location,
        #[source]
        source: BoxError,
    },

    /// Encoding, flushing or closing the output failed
    #[error("output error in {location}: {source}")]
    Output {
        location: Location,
        #[source]
        source: BoxError,
    },
}

impl CsvError {
    pub fn iteration(
        path: impl Into<PathBuf>,
        line: Option<usize>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Iteration {
            location: Location::new(path, line),
            source: source.into(),
        }
    }

    pub fn conversion(
        path: impl Into<PathBuf>,
        line: Option<usize>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Conversion {
            location: Location::new(path, line),
            source: source.into(),
        }
    }

    pub fn output(
        path: impl Into<PathBuf>,
        line: Option<usize>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Output {
            location: Location::new(path, line),
            source: source.into(),
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Self::Iteration { location, .. }
            | Self::Conversion { location, .. }
            | Self::Output { location, .. } => location,
        }
    }

    pub fn path(&self) -> &Path {
        &self.location().path
    }

    pub fn line(&self) -> Option<usize> {
        self.location().line
    }

    pub fn is_iteration(&self) -> bool {
        matches!(self, Self::Iteration { .. })
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output { .. })
    }

    /// Borrow the underlying cause
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        match self {
            Self::Iteration { source, .. }
            | Self::Conversion { source, .. }
            | Self::Output { source, .. } => source.as_ref(),
        }
    }

    /// Consume the error and return the underlying cause
    pub fn into_cause(self) -> BoxError {
        match self {
            Self::Iteration { source, .. }
            | Self::Conversion { source, .. }
            | Self::Output { source, .. } => source,
        }
    }
}
