//! Block feed that polls a `BlockSource` for each block in range

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use super::{BlockFeed, FeedError, FeedPublisher, Subscription};
use crate::domain::models::{BlockRange, TerminationReason};
use crate::infrastructure::ledger::{BlockSource, ChannelHandle};
use crate::utils::logging;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Walks the range in order, waiting on blocks that are not committed yet.
///
/// After the last block is published the feed stays open until the
/// subscriber closes it, then reports `Terminated(Shutdown)`.
#[derive(Debug, Clone)]
pub struct PollingBlockFeed {
    source: Arc<dyn BlockSource>,
    poll_interval: Duration,
}

impl PollingBlockFeed {
    pub fn new(source: Arc<dyn BlockSource>) -> Self {
        Self::with_poll_interval(source, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(source: Arc<dyn BlockSource>, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
        }
    }
}

#[async_trait]
impl BlockFeed for PollingBlockFeed {
    async fn subscribe(
        &self,
        channel: &ChannelHandle,
        peer: &str,
        range: BlockRange,
    ) -> Result<Subscription, FeedError> {
        let first = match (range.last_block(), u64::try_from(range.start)) {
            (Some(_), Ok(first)) => first,
            _ => return Err(FeedError::EmptyRange(range)),
        };

        let (publisher, subscription) = Subscription::open();
        let worker = PollWorker {
            source: Arc::clone(&self.source),
            channel: channel.clone(),
            peer: peer.to_string(),
            range,
            poll_interval: self.poll_interval,
        };
        tokio::spawn(worker.run(first, publisher));

        Ok(subscription)
    }
}

struct PollWorker {
    source: Arc<dyn BlockSource>,
    channel: ChannelHandle,
    peer: String,
    range: BlockRange,
    poll_interval: Duration,
}

impl PollWorker {
    async fn run(self, first: u64, publisher: FeedPublisher) {
        let mut next = first;

        while self.range.contains(next) {
            tokio::select! {
                biased;
                _ = publisher.closed() => break,
                lookup = self.source.block_exists(&self.channel, &self.peer, next) => match lookup {
                    Ok(true) => {
                        logging::log_debug(&format!(
                            "[{}] Block {} available on {}",
                            self.channel.name, next, self.peer
                        ));
                        if !publisher.publish_block(next) {
                            return;
                        }
                        next += 1;
                    }
                    Ok(false) => {
                        tokio::select! {
                            _ = publisher.closed() => break,
                            _ = sleep(self.poll_interval) => {}
                        }
                    }
                    Err(e) => {
                        logging::log_error(&format!(
                            "[{}] Block feed failed at block {}: {}",
                            self.channel.name, next, e
                        ));
                        publisher.terminate(TerminationReason::Error(e.to_string()));
                        return;
                    }
                }
            }
        }

        publisher.closed().await;
        publisher.terminate(TerminationReason::Shutdown);
    }
}
