use thiserror::Error;

use crate::infrastructure::checkpoint::CheckpointError;
use crate::infrastructure::feed::FeedError;
use crate::infrastructure::ledger::LedgerError;

/// Failure of a processing session. Every variant is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A required request field is missing
    #[error("Validation error: {0}")]
    Validation(String),
    /// The checkpoint store or the ledger could not be reached
    #[error("Connection error: {0}")]
    Connection(String),
    /// The block feed stopped abnormally
    #[error("Feed error: {0}")]
    Feed(String),
    /// The host cancelled the session
    #[error("Session cancelled")]
    Cancelled,
    /// The session task panicked before producing an outcome
    #[error("Session task panicked: {0}")]
    Panicked(String),
}

impl From<CheckpointError> for SessionError {
    fn from(error: CheckpointError) -> Self {
        SessionError::Connection(error.to_string())
    }
}

impl From<LedgerError> for SessionError {
    fn from(error: LedgerError) -> Self {
        SessionError::Connection(error.to_string())
    }
}

impl From<FeedError> for SessionError {
    fn from(error: FeedError) -> Self {
        SessionError::Feed(error.to_string())
    }
}
