use thiserror::Error;

/// Represents errors that can occur while talking to the ledger network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The gateway could not be reached or refused the session
    #[error("Connection error: {0}")]
    ConnectionError(String),
    /// Credentials could not be turned into an identity
    #[error("Identity error: {0}")]
    IdentityError(String),
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Transport failure during a call
    #[error("Network error: {0}")]
    NetworkError(String),
    /// The gateway answered with an RPC error
    #[error("RPC error: {0}")]
    RpcError(String),
    /// The gateway answered with something unexpected
    #[error("Parse error: {0}")]
    ParseError(String),
    /// A channel operation was attempted before `connect`
    #[error("Not connected to the ledger gateway")]
    NotConnected,
}
