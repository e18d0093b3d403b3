//! Works out which blocks a session has to process

use crate::domain::models::BlockRange;

/// Combines overrides, the stored checkpoint and the chain height into a range
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeResolver;

impl RangeResolver {
    /// First block: the override, else the block after the checkpoint, else 0.
    /// Last block: the override, else `chain_height - 1`.
    ///
    /// `chain_height` is only read when there is no end override; an unknown
    /// height is treated as an empty chain.
    pub fn resolve(
        start_override: Option<u64>,
        end_override: Option<u64>,
        last_checkpoint: Option<u64>,
        chain_height: Option<u64>,
    ) -> BlockRange {
        let start = match (start_override, last_checkpoint) {
            (Some(start), _) => to_signed(start),
            (None, Some(checkpoint)) => to_signed(checkpoint).saturating_add(1),
            (None, None) => 0,
        };

        let end = match end_override {
            Some(end) => to_signed(end),
            None => to_signed(chain_height.unwrap_or(0)) - 1,
        };

        BlockRange::new(start, end)
    }

    /// Whether resolving needs the current chain height
    pub fn needs_chain_height(end_override: Option<u64>) -> bool {
        end_override.is_none()
    }
}

fn to_signed(block: u64) -> i64 {
    i64::try_from(block).unwrap_or(i64::MAX)
}
