use serde::{Deserialize, Serialize};

use crate::domain::models::BlockRange;

/// Outcome of a completed processing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub start_block: i64,
    pub end_block: i64,
    /// Block numbers in the order they arrived from the feed
    pub block_events_processed: Vec<u64>,
}

impl ProcessingResult {
    pub fn new(range: BlockRange, block_events_processed: Vec<u64>) -> Self {
        Self {
            start_block: range.start,
            end_block: range.end,
            block_events_processed,
        }
    }

    /// Result for a run that had nothing to process
    pub fn empty(range: BlockRange) -> Self {
        Self::new(range, Vec::new())
    }
}
