//! Ledger network access
//!
//! The session only depends on the `LedgerConnector` and `BlockSource`
//! traits; `GatewayConnector` is the JSON-RPC gateway implementation.

mod error;
mod gateway;
mod identity;

pub use error::LedgerError;
pub use gateway::GatewayConnector;
pub use identity::Identity;

use async_trait::async_trait;

use crate::domain::models::{ConnectionProfile, Credentials};

/// Authenticated session with the ledger network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    pub session_id: String,
    pub identity: String,
}

/// A named channel within a connected network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub session_id: String,
    pub name: String,
}

/// Establishes sessions and resolves channels on the ledger network
#[async_trait]
pub trait LedgerConnector: Send + Sync + std::fmt::Debug {
    /// Establish identity and open a session
    async fn connect(
        &self,
        credentials: &Credentials,
        profile: &ConnectionProfile,
    ) -> Result<ConnectionHandle, LedgerError>;

    /// Resolve a channel by name
    async fn get_channel(
        &self,
        connection: &ConnectionHandle,
        channel_name: &str,
    ) -> Result<ChannelHandle, LedgerError>;

    /// Current chain height, i.e. the number of blocks on the channel
    async fn query_height(&self, channel: &ChannelHandle) -> Result<u64, LedgerError>;

    /// Release whatever `connect` set up for this session
    async fn disconnect(&self, _connection: &ConnectionHandle) {}
}

/// Point lookups of blocks, used by polling feeds
#[async_trait]
pub trait BlockSource: Send + Sync + std::fmt::Debug {
    /// Whether the block with this number has been committed on the peer
    async fn block_exists(
        &self,
        channel: &ChannelHandle,
        peer: &str,
        number: u64,
    ) -> Result<bool, LedgerError>;
}
