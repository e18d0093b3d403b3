use thiserror::Error;

use crate::domain::models::BlockRange;
use crate::infrastructure::ledger::LedgerError;

/// Error type for block feed operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// A feed cannot be opened over an empty range
    #[error("Cannot subscribe to empty block range {0}")]
    EmptyRange(BlockRange),
    /// The subscription could not be established
    #[error("Subscription failed: {0}")]
    SubscribeFailed(String),
    /// The ledger rejected a feed call
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
