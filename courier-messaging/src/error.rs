//! Messaging error types.

use thiserror::Error;

/// Result type for messaging operations.
pub type MessagingResult<T> = Result<T, MessagingError>;

/// Errors that can occur during messaging operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// The requested topic is not known to the provider.
    #[error("topic not found: {topic}")]
    TopicNotFound {
        /// The topic that was not found.
        topic: String,
    },

    /// Releasing a subscription failed.
    #[error("failed to close subscription on {topic}: {message}")]
    CloseFailed {
        /// The topic the subscription was attached to.
        topic: String,
        /// Provider-specific failure description.
        message: String,
    },

    /// I/O error in the underlying transport.
    #[error("I/O error: {operation}: {message}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// Error message.
        message: String,
    },
}
