mod accumulator;
mod completion;
mod handle;
mod observer;
mod state;

pub use completion::SessionOutcome;
pub use handle::SessionHandle;
pub use observer::{LoggingObserver, SessionObserver};
pub use state::{Phase, SessionState};

use std::future::Future;
use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use accumulator::{BlockAccumulator, Step};
use completion::Completion;

use crate::domain::errors::SessionError;
use crate::domain::models::{BlockRange, ProcessingRequest, ProcessingResult, ValidatedRequest};
use crate::domain::services::RangeResolver;
use crate::infrastructure::checkpoint::CheckpointStore;
use crate::infrastructure::feed::{BlockFeed, Subscription};
use crate::infrastructure::ledger::{ConnectionHandle, LedgerConnector};

const UNVALIDATED_STREAM: &str = "session";

/// Resumes a block stream from its checkpoint, processes the resolved range
/// once, and advances the checkpoint.
///
/// A session is single-use: `run` and `spawn` consume it.
#[derive(Debug)]
pub struct ProcessingSession {
    checkpoint_store: Arc<dyn CheckpointStore>,
    connector: Arc<dyn LedgerConnector>,
    feed: Arc<dyn BlockFeed>,
    observer: Arc<dyn SessionObserver>,
    cancel: CancellationToken,
}

impl ProcessingSession {
    pub fn new(
        checkpoint_store: Arc<dyn CheckpointStore>,
        connector: Arc<dyn LedgerConnector>,
        feed: Arc<dyn BlockFeed>,
    ) -> Self {
        Self {
            checkpoint_store,
            connector,
            feed,
            observer: Arc::new(LoggingObserver),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Abort the session when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Process one request and resolve exactly once with its result or error
    pub async fn run(self, request: ProcessingRequest) -> SessionOutcome {
        let (completion, outcome) = Completion::channel();
        self.drive(request, completion).await;
        outcome.await.unwrap_or(Err(SessionError::Cancelled))
    }

    /// Run the session on its own task
    pub fn spawn(self, request: ProcessingRequest) -> SessionHandle {
        let (completion, outcome) = Completion::channel();
        let cancel = self.cancel.clone();
        let task = tokio::spawn(self.drive(request, completion));
        SessionHandle::new(outcome, cancel, task)
    }

    async fn drive(self, request: ProcessingRequest, mut completion: Completion) {
        let stream = request
            .connection_profile
            .as_ref()
            .map(|profile| profile.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNVALIDATED_STREAM.to_string());

        let outcome = self.execute(&stream, request).await;

        let state = if outcome.is_ok() {
            SessionState::Completed
        } else {
            SessionState::Failed
        };
        self.observer.state_changed(&stream, state);
        self.observer.completed(&stream, &outcome);
        completion.fulfil(outcome);
    }

    async fn execute(&self, stream: &str, request: ProcessingRequest) -> SessionOutcome {
        self.observer.state_changed(stream, SessionState::Validating);
        let request = request.validate()?;

        self.observer.state_changed(stream, SessionState::Connecting);
        let connection = self
            .guarded(
                stream,
                Phase::Connect,
                self.connector
                    .connect(&request.credentials, &request.connection_profile),
            )
            .await?;

        let outcome = self.process(stream, &request, &connection).await;
        self.connector.disconnect(&connection).await;
        outcome
    }

    async fn process(
        &self,
        stream: &str,
        request: &ValidatedRequest,
        connection: &ConnectionHandle,
    ) -> SessionOutcome {
        let channel = self
            .guarded(
                stream,
                Phase::ChannelOpen,
                self.connector.get_channel(connection, request.stream_name()),
            )
            .await?;

        self.observer.state_changed(stream, SessionState::RangeResolving);
        let checkpoint = self
            .guarded(
                stream,
                Phase::CheckpointGet,
                self.checkpoint_store.get(request.stream_name()),
            )
            .await?;
        let chain_height = if RangeResolver::needs_chain_height(request.end_block) {
            Some(
                self.guarded(stream, Phase::HeightQuery, self.connector.query_height(&channel))
                    .await?,
            )
        } else {
            None
        };
        let range =
            RangeResolver::resolve(request.start_block, request.end_block, checkpoint, chain_height);
        self.observer.range_resolved(stream, range, checkpoint);

        if range.is_empty() {
            self.observer.state_changed(stream, SessionState::RangeEmpty);
            return Ok(ProcessingResult::empty(range));
        }

        self.observer.state_changed(stream, SessionState::Streaming);
        let subscription = self
            .guarded(
                stream,
                Phase::Subscribe,
                self.feed.subscribe(&channel, &request.peer, range),
            )
            .await?;
        let processed = self.stream_blocks(stream, range, subscription).await?;

        self.observer.state_changed(stream, SessionState::Finalizing);
        self.finalize(stream, request, range).await?;

        Ok(ProcessingResult::new(range, processed))
    }

    /// Consume feed events until the feed terminates
    async fn stream_blocks(
        &self,
        stream: &str,
        range: BlockRange,
        mut subscription: Subscription,
    ) -> Result<Vec<u64>, SessionError> {
        let mut accumulator = BlockAccumulator::new(range);

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    subscription.close();
                    return Err(SessionError::Cancelled);
                }
                event = subscription.next_event() => event,
            };

            let Some(event) = event else {
                return Err(SessionError::Feed(
                    "block feed ended without a termination notice".to_string(),
                ));
            };

            match accumulator.on_event(event) {
                Step::Recorded(block) => self.observer.block_received(stream, block),
                Step::ReachedEnd(block) => {
                    self.observer.block_received(stream, block);
                    subscription.close();
                }
                Step::OutOfRange(block) => {
                    self.observer
                        .block_ignored(stream, block, &format!("outside range {}", range));
                }
                Step::AfterTermination => {}
                Step::Drained => return Ok(accumulator.into_processed()),
                Step::Failed(reason) => return Err(SessionError::Feed(reason)),
            }
        }
    }

    /// Record the last block of the range. Only called after a graceful shutdown.
    async fn finalize(
        &self,
        stream: &str,
        request: &ValidatedRequest,
        range: BlockRange,
    ) -> Result<(), SessionError> {
        let Some(last_block) = range.last_block() else {
            return Ok(());
        };

        let started = Instant::now();
        self.checkpoint_store
            .set(request.stream_name(), last_block)
            .await?;
        self.observer
            .phase_completed(stream, Phase::CheckpointSet, started.elapsed());
        Ok(())
    }

    /// Await an external call, timing it and aborting on cancellation
    async fn guarded<T, E>(
        &self,
        stream: &str,
        phase: Phase,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, SessionError>
    where
        E: Into<SessionError>,
    {
        let started = Instant::now();
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(SessionError::Cancelled),
            result = call => result.map_err(Into::into),
        };
        if result.is_ok() {
            self.observer.phase_completed(stream, phase, started.elapsed());
        }
        result
    }
}
