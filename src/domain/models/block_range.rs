use serde::{Deserialize, Serialize};

/// Inclusive range of block numbers to process in one session.
///
/// `end` is signed so that an empty chain (height 0) resolves to `end = -1`
/// instead of wrapping. Any range with `start > end` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    pub start: i64,
    pub end: i64,
}

impl BlockRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// True when there is nothing to process
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Check whether a block number falls inside the range
    pub fn contains(&self, block: u64) -> bool {
        match i64::try_from(block) {
            Ok(block) => block >= self.start && block <= self.end,
            Err(_) => false,
        }
    }

    /// Whether `block` is the last block of the range
    pub fn is_end(&self, block: u64) -> bool {
        i64::try_from(block).map_or(false, |block| block == self.end)
    }

    /// The last block as a checkpoint value, or `None` for an empty range
    pub fn last_block(&self) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        u64::try_from(self.end).ok()
    }

    /// Number of blocks covered by the range
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as u64
        }
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
