//! Range-bounded block feeds
//!
//! A subscription delivers `FeedEvent`s on one channel: any number of
//! `BlockArrived` followed by exactly one `Terminated`.

mod error;
mod polling;
mod subscription;

pub use error::FeedError;
pub use polling::PollingBlockFeed;
pub use subscription::{FeedPublisher, Subscription};

use async_trait::async_trait;

use crate::domain::models::BlockRange;
use crate::infrastructure::ledger::ChannelHandle;

/// Subscribes to block arrivals on a channel
#[async_trait]
pub trait BlockFeed: Send + Sync + std::fmt::Debug {
    /// Open a feed limited to `range`, observed through `peer`
    async fn subscribe(
        &self,
        channel: &ChannelHandle,
        peer: &str,
        range: BlockRange,
    ) -> Result<Subscription, FeedError>;
}
