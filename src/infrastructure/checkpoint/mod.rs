//! Checkpoint persistence
//!
//! A checkpoint is the last block number fully processed for a stream. The
//! session reads it once at start and writes it once on a graceful finish.

mod error;
mod memory;

pub use error::CheckpointError;
pub use memory::MemoryCheckpointStore;

use async_trait::async_trait;

/// Durable integer checkpoint keyed by stream name
#[async_trait]
pub trait CheckpointStore: Send + Sync + std::fmt::Debug {
    /// Last checkpoint for the stream, `None` if it was never written
    async fn get(&self, stream_name: &str) -> Result<Option<u64>, CheckpointError>;

    /// Record a new checkpoint. Writing the same value twice is harmless.
    async fn set(&self, stream_name: &str, value: u64) -> Result<(), CheckpointError>;
}
