use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::models::{FeedEvent, TerminationReason};

/// Consumer side of a block feed
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::UnboundedReceiver<FeedEvent>,
    shutdown: CancellationToken,
}

/// Producer side of a block feed, held by the feed implementation
#[derive(Debug)]
pub struct FeedPublisher {
    events: mpsc::UnboundedSender<FeedEvent>,
    shutdown: CancellationToken,
}

impl Subscription {
    /// Create a connected publisher/subscription pair
    pub fn open() -> (FeedPublisher, Subscription) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        (
            FeedPublisher {
                events: sender,
                shutdown: shutdown.clone(),
            },
            Subscription {
                events: receiver,
                shutdown,
            },
        )
    }

    /// Wrap an existing event channel. `close` cancels `shutdown`; the feed
    /// behind `events` must answer it with one `Terminated(Shutdown)`.
    pub fn from_parts(
        events: mpsc::UnboundedReceiver<FeedEvent>,
        shutdown: CancellationToken,
    ) -> Subscription {
        Subscription { events, shutdown }
    }

    /// Next notification, `None` once the publisher is gone
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.events.recv().await
    }

    /// Request graceful termination. The feed answers with `Terminated(Shutdown)`.
    pub fn close(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl FeedPublisher {
    /// Deliver a block arrival. Returns false when the subscriber is gone.
    pub fn publish_block(&self, block: u64) -> bool {
        self.events.send(FeedEvent::BlockArrived(block)).is_ok()
    }

    /// Deliver the terminal notification. Consumes the publisher so it can only happen once.
    pub fn terminate(self, reason: TerminationReason) {
        let _ = self.events.send(FeedEvent::Terminated(reason));
    }

    /// Resolves once the subscriber has called `close` or dropped the subscription
    pub async fn closed(&self) {
        self.shutdown.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let (publisher, mut subscription) = Subscription::open();
        assert!(publisher.publish_block(5));
        assert!(publisher.publish_block(6));
        publisher.terminate(TerminationReason::Shutdown);

        assert_eq!(subscription.next_event().await, Some(FeedEvent::BlockArrived(5)));
        assert_eq!(subscription.next_event().await, Some(FeedEvent::BlockArrived(6)));
        assert_eq!(
            subscription.next_event().await,
            Some(FeedEvent::Terminated(TerminationReason::Shutdown))
        );
        assert_eq!(subscription.next_event().await, None);
    }

    #[tokio::test]
    async fn close_is_visible_to_publisher() {
        let (publisher, subscription) = Subscription::open();
        subscription.close();
        publisher.closed().await;
        assert!(publisher.publish_block(1));
    }

    #[tokio::test]
    async fn dropping_subscription_stops_publisher() {
        let (publisher, subscription) = Subscription::open();
        drop(subscription);
        publisher.closed().await;
        assert!(!publisher.publish_block(1));
    }
}
