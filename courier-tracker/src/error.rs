//! Tracker error types.

use courier_messaging::MessagingError;
use thiserror::Error;

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors that can occur during tracker lifecycle operations.
///
/// Queries never fail: absence of a status is a result, not an error.
/// Only subscribing to and releasing the status topic can go wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The messaging provider failed to create or release the status
    /// subscription.
    #[error("messaging failure: {0}")]
    Messaging(#[from] MessagingError),
}
