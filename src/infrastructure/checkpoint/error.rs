use thiserror::Error;

use crate::infrastructure::persistence::DbError;

/// Error type for checkpoint store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointError {
    /// The store could not be reached
    #[error("Checkpoint store unreachable: {0}")]
    Connection(String),
    /// The store answered but the operation failed
    #[error("Checkpoint store error: {0}")]
    Other(String),
}

impl From<DbError> for CheckpointError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::ConnectionError(msg) => CheckpointError::Connection(msg),
            DbError::SeaOrmError(sea_orm::DbErr::Conn(e)) => CheckpointError::Connection(e.to_string()),
            DbError::SeaOrmError(sea_orm::DbErr::ConnectionAcquire(e)) => {
                CheckpointError::Connection(e.to_string())
            }
            other => CheckpointError::Other(other.to_string()),
        }
    }
}
