use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CheckpointError, CheckpointStore};

/// Checkpoint store held in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    checkpoints: Arc<Mutex<HashMap<String, u64>>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a checkpoint for one stream
    pub fn with_checkpoint(stream_name: &str, value: u64) -> Self {
        let mut checkpoints = HashMap::new();
        checkpoints.insert(stream_name.to_string(), value);
        Self {
            checkpoints: Arc::new(Mutex::new(checkpoints)),
        }
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn get(&self, stream_name: &str) -> Result<Option<u64>, CheckpointError> {
        Ok(self.checkpoints.lock().await.get(stream_name).copied())
    }

    async fn set(&self, stream_name: &str, value: u64) -> Result<(), CheckpointError> {
        self.checkpoints
            .lock()
            .await
            .insert(stream_name.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_checkpoint_is_none() {
        let store = MemoryCheckpointStore::new();
        assert_eq!(store.get("mychannel").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_is_idempotent_and_keyed_by_stream() {
        let store = MemoryCheckpointStore::with_checkpoint("other", 3);
        store.set("mychannel", 7).await.unwrap();
        store.set("mychannel", 7).await.unwrap();
        assert_eq!(store.get("mychannel").await.unwrap(), Some(7));
        assert_eq!(store.get("other").await.unwrap(), Some(3));
    }
}
