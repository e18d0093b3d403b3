use std::fmt;

/// Lifecycle of a processing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Validating,
    Connecting,
    RangeResolving,
    RangeEmpty,
    Streaming,
    Finalizing,
    Completed,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Validating => "validating",
            SessionState::Connecting => "connecting",
            SessionState::RangeResolving => "range_resolving",
            SessionState::RangeEmpty => "range_empty",
            SessionState::Streaming => "streaming",
            SessionState::Finalizing => "finalizing",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Timed external calls made by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    ChannelOpen,
    CheckpointGet,
    HeightQuery,
    Subscribe,
    CheckpointSet,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Connect => "ledger.connect",
            Phase::ChannelOpen => "ledger.channel_open",
            Phase::CheckpointGet => "checkpoint.get",
            Phase::HeightQuery => "ledger.query_height",
            Phase::Subscribe => "feed.subscribe",
            Phase::CheckpointSet => "checkpoint.set",
        };
        f.write_str(name)
    }
}
