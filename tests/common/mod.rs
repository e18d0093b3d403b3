#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use ledger_indexer::application::{SessionObserver, SessionState};
use ledger_indexer::domain::models::{
    BlockRange, ConnectionProfile, Credentials, FeedEvent, ProcessingRequest, StoreEndpoint,
    TerminationReason,
};
use ledger_indexer::infrastructure::checkpoint::{
    CheckpointError, CheckpointStore, MemoryCheckpointStore,
};
use ledger_indexer::infrastructure::feed::{BlockFeed, FeedError, Subscription};
use ledger_indexer::infrastructure::ledger::{
    BlockSource, ChannelHandle, ConnectionHandle, LedgerConnector, LedgerError,
};

pub const CHANNEL: &str = "mychannel";
pub const PEER: &str = "peer0.org1.example.com";

/// Ordered record of side effects across all fakes of one test
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

pub fn request() -> ProcessingRequest {
    ProcessingRequest::new(
        StoreEndpoint::new("postgres://indexer@localhost/ledger"),
        Credentials::new("admin", "a2V5", "Y2VydA=="),
        ConnectionProfile::new(CHANNEL).with_peer(PEER, "grpcs://peer0:7051"),
    )
}

/// In-memory store that records calls and can be made to fail
#[derive(Debug)]
pub struct RecordingStore {
    inner: MemoryCheckpointStore,
    log: EventLog,
    unreachable: AtomicBool,
    failing_writes: AtomicBool,
    panicking: AtomicBool,
}

impl RecordingStore {
    pub fn new(log: &EventLog, checkpoint: Option<u64>) -> Arc<Self> {
        let inner = match checkpoint {
            Some(value) => MemoryCheckpointStore::with_checkpoint(CHANNEL, value),
            None => MemoryCheckpointStore::new(),
        };
        Arc::new(Self {
            inner,
            log: log.clone(),
            unreachable: AtomicBool::new(false),
            failing_writes: AtomicBool::new(false),
            panicking: AtomicBool::new(false),
        })
    }

    pub fn unreachable(log: &EventLog) -> Arc<Self> {
        let store = Self::new(log, None);
        store.unreachable.store(true, Ordering::SeqCst);
        store
    }

    /// Reads succeed, every write is refused
    pub fn failing_writes(log: &EventLog, checkpoint: Option<u64>) -> Arc<Self> {
        let store = Self::new(log, checkpoint);
        store.failing_writes.store(true, Ordering::SeqCst);
        store
    }

    /// Panics on the first read
    pub fn panicking(log: &EventLog) -> Arc<Self> {
        let store = Self::new(log, None);
        store.panicking.store(true, Ordering::SeqCst);
        store
    }

    pub async fn checkpoint(&self, stream: &str) -> Option<u64> {
        self.inner.get(stream).await.unwrap()
    }
}

#[async_trait]
impl CheckpointStore for RecordingStore {
    async fn get(&self, stream_name: &str) -> Result<Option<u64>, CheckpointError> {
        self.log.push(format!("store:get:{}", stream_name));
        if self.panicking.load(Ordering::SeqCst) {
            panic!("checkpoint store exploded");
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(CheckpointError::Connection("connection refused".to_string()));
        }
        self.inner.get(stream_name).await
    }

    async fn set(&self, stream_name: &str, value: u64) -> Result<(), CheckpointError> {
        self.log.push(format!("store:set:{}", value));
        if self.unreachable.load(Ordering::SeqCst) || self.failing_writes.load(Ordering::SeqCst) {
            return Err(CheckpointError::Connection("connection refused".to_string()));
        }
        self.inner.set(stream_name, value).await
    }
}

/// Ledger with a fixed height where every block below the height exists
#[derive(Debug)]
pub struct FakeLedger {
    height: u64,
    connect: ConnectBehaviour,
    log: EventLog,
    height_queries: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectBehaviour {
    Succeed,
    Fail,
    Hang,
}

impl FakeLedger {
    pub fn new(log: &EventLog, height: u64) -> Arc<Self> {
        Self::build(log, height, ConnectBehaviour::Succeed)
    }

    pub fn unreachable(log: &EventLog) -> Arc<Self> {
        Self::build(log, 0, ConnectBehaviour::Fail)
    }

    /// `connect` never returns
    pub fn hanging(log: &EventLog) -> Arc<Self> {
        Self::build(log, 0, ConnectBehaviour::Hang)
    }

    fn build(log: &EventLog, height: u64, connect: ConnectBehaviour) -> Arc<Self> {
        Arc::new(Self {
            height,
            connect,
            log: log.clone(),
            height_queries: AtomicUsize::new(0),
        })
    }

    pub fn height_queries(&self) -> usize {
        self.height_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerConnector for FakeLedger {
    async fn connect(
        &self,
        credentials: &Credentials,
        profile: &ConnectionProfile,
    ) -> Result<ConnectionHandle, LedgerError> {
        self.log.push("ledger:connect");
        match self.connect {
            ConnectBehaviour::Succeed => {}
            ConnectBehaviour::Fail => {
                return Err(LedgerError::ConnectionError(format!(
                    "Could not connect to {}",
                    profile.name
                )));
            }
            ConnectBehaviour::Hang => std::future::pending::<()>().await,
        }
        Ok(ConnectionHandle {
            session_id: "session-1".to_string(),
            identity: credentials.identity_name().to_string(),
        })
    }

    async fn get_channel(
        &self,
        connection: &ConnectionHandle,
        channel_name: &str,
    ) -> Result<ChannelHandle, LedgerError> {
        self.log.push(format!("ledger:channel:{}", channel_name));
        Ok(ChannelHandle {
            session_id: connection.session_id.clone(),
            name: channel_name.to_string(),
        })
    }

    async fn query_height(&self, _channel: &ChannelHandle) -> Result<u64, LedgerError> {
        self.height_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.height)
    }

    async fn disconnect(&self, connection: &ConnectionHandle) {
        self.log.push(format!("ledger:disconnect:{}", connection.session_id));
    }
}

#[async_trait]
impl BlockSource for FakeLedger {
    async fn block_exists(
        &self,
        _channel: &ChannelHandle,
        _peer: &str,
        number: u64,
    ) -> Result<bool, LedgerError> {
        Ok(number < self.height)
    }
}

/// What a scripted feed sends
#[derive(Debug, Clone)]
pub enum Script {
    /// Every block of the subscribed range in order, then shutdown on close
    WholeRange,
    /// `before_close` right after subscribing, `after_close` once closed
    Events {
        before_close: Vec<FeedEvent>,
        after_close: Vec<FeedEvent>,
    },
    /// Nothing until closed, then shutdown
    Silent,
}

impl Script {
    pub fn blocks(blocks: &[u64]) -> Self {
        Script::Events {
            before_close: blocks.iter().copied().map(FeedEvent::BlockArrived).collect(),
            after_close: vec![FeedEvent::Terminated(TerminationReason::Shutdown)],
        }
    }
}

/// Feed replaying a script through a raw event channel
#[derive(Debug)]
pub struct ScriptedFeed {
    script: Script,
    log: EventLog,
    subscriptions: AtomicUsize,
}

impl ScriptedFeed {
    pub fn new(log: &EventLog, script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            log: log.clone(),
            subscriptions: AtomicUsize::new(0),
        })
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockFeed for ScriptedFeed {
    async fn subscribe(
        &self,
        channel: &ChannelHandle,
        peer: &str,
        range: BlockRange,
    ) -> Result<Subscription, FeedError> {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        self.log
            .push(format!("feed:subscribe:{}:{}:{}", channel.name, peer, range));

        let (before_close, after_close) = match &self.script {
            Script::WholeRange => (
                (range.start..=range.end)
                    .map(|n| FeedEvent::BlockArrived(n as u64))
                    .collect(),
                vec![FeedEvent::Terminated(TerminationReason::Shutdown)],
            ),
            Script::Events {
                before_close,
                after_close,
            } => (before_close.clone(), after_close.clone()),
            Script::Silent => (
                Vec::new(),
                vec![FeedEvent::Terminated(TerminationReason::Shutdown)],
            ),
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let closed = shutdown.clone();
        let log = self.log.clone();

        for event in before_close {
            let _ = sender.send(event);
        }
        tokio::spawn(async move {
            closed.cancelled().await;
            log.push("feed:close");
            for event in after_close {
                if let FeedEvent::Terminated(reason) = &event {
                    log.push(format!("feed:terminate:{:?}", reason));
                }
                let _ = sender.send(event);
            }
        });

        Ok(Subscription::from_parts(receiver, shutdown))
    }
}

/// Observer collecting state transitions
#[derive(Debug, Default)]
pub struct StateRecorder(Mutex<Vec<SessionState>>);

impl StateRecorder {
    pub fn states(&self) -> Vec<SessionState> {
        self.0.lock().unwrap().clone()
    }
}

impl SessionObserver for StateRecorder {
    fn state_changed(&self, _stream: &str, state: SessionState) {
        self.0.lock().unwrap().push(state);
    }
}
