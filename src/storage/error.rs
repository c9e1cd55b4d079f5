//! Error types for store operations

use std::fmt;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing alert state
#[derive(Debug)]
pub enum StoreError {
    /// The referenced alert does not exist
    AlertNotFound(crate::AlertId),

    /// A subscription references a destination that does not exist
    DestinationNotFound(crate::DestinationId),

    /// The transition commit failed; nothing was written
    CommitFailed(String),

    /// Backend-specific error
    BackendError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::AlertNotFound(id) => write!(f, "alert {} not found", id),
            StoreError::DestinationNotFound(id) => write!(f, "destination {} not found", id),
            StoreError::CommitFailed(msg) => write!(f, "transition commit failed: {}", msg),
            StoreError::BackendError(msg) => write!(f, "alert store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
