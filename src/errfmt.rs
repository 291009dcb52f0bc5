//! Uniform `operation:message` error values.

use thiserror::Error;

use crate::error::BoxError;

#[derive(Error, Debug)]
pub enum OperationError {
    /// Displayed as `operation:message`
    #[error("{operation}:{message}")]
    Message { operation: String, message: String },

    /// Displayed as `operation:message error:cause`
    #[error("{operation}:{message} error:{source}")]
    Wrapped {
        operation: String,
        message: String,
        #[source]
        source: BoxError,
    },
}

impl OperationError {
    pub fn operation(&self) -> &str {
        match self {
            Self::Message { operation, .. } | Self::Wrapped { operation, .. } => operation,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Message { message, .. } | Self::Wrapped { message, .. } => message,
        }
    }
}

/// Create an error formatted as `operation:message`
pub fn create_error(operation: impl Into<String>, message: impl Into<String>) -> OperationError {
    OperationError::Message {
        operation: operation.into(),
        message: message.into(),
    }
}

/// Wrap `cause` in an error formatted as `operation:message error:cause`
pub fn wrap_error(
    operation: impl Into<String>,
    message: impl Into<String>,
    cause: impl Into<BoxError>,
) -> OperationError {
    OperationError::Wrapped {
        operation: operation.into(),
        message: message.into(),
        source: cause.into(),
    }
}
