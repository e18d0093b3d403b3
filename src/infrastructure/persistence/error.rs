use thiserror::Error;

/// Error type for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SeaORM
    #[error("Database error: {0}")]
    SeaOrmError(#[from] sea_orm::DbErr),
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Stored value cannot be represented
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
