/// Why a block feed stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The subscriber asked the feed to close
    Shutdown,
    /// The feed failed and cannot continue
    Error(String),
}

/// Notification delivered by a block feed subscription.
///
/// Block arrivals and the single terminal notification travel on the same
/// channel, so a `Terminated` event is always observed after every block
/// that was queued before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    BlockArrived(u64),
    Terminated(TerminationReason),
}
