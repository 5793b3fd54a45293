//! Public error types for the `instance-query` module.
//!
//! These errors are safe to expose to other modules: internal failures name
//! the lookup and its key, never the storage driver's message.

use thiserror::Error;

/// Errors that can be returned by the `InstanceQueryClient`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceQueryError {
    /// The query could not be constructed; nothing was executed.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A single-instance lookup matched no row.
    #[error("instance not found: {key}")]
    NotFound { key: String },

    /// Execution, decoding, cancellation or timeout failure.
    #[error("internal error in {operation} ({key})")]
    Internal { operation: String, key: String },
}

impl InstanceQueryError {
    /// Create an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a `NotFound` error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an `Internal` error.
    pub fn internal(operation: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Internal {
            operation: operation.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
