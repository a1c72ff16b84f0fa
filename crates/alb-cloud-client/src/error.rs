//! Cloud client errors

use thiserror::Error;

/// Errors that can occur when talking to the cloud load-balancing service
#[derive(Debug, Error)]
pub enum CloudError {
    /// The service rejected or failed the operation
    #[error("{operation} failed: {message}")]
    Api {
        /// Operation name (e.g. `CreateLoadBalancer`)
        operation: String,
        /// Service-provided message
        message: String,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request was throttled by the service
    #[error("Throttled: {0}")]
    Throttled(String),

    /// Invalid request (e.g., missing required fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The caller cancelled the in-flight call
    #[error("{operation} cancelled")]
    Cancelled {
        /// Operation that was aborted
        operation: String,
    },

    /// The caller-supplied deadline elapsed before the call completed
    #[error("{operation} exceeded its deadline")]
    DeadlineExceeded {
        /// Operation that was aborted
        operation: String,
    },
}

impl CloudError {
    /// Returns true when the error was produced by the call context rather than the service.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CloudError::Cancelled { .. } | CloudError::DeadlineExceeded { .. })
    }
}
