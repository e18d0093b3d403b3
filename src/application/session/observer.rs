use std::time::Duration;

use crate::domain::errors::SessionError;
use crate::domain::models::{BlockRange, ProcessingResult};
use crate::utils::logging;

use super::{Phase, SessionState};

/// Receives progress notifications from a session.
///
/// Every method has an empty default so observers only implement what they need.
pub trait SessionObserver: Send + Sync + std::fmt::Debug {
    fn state_changed(&self, _stream: &str, _state: SessionState) {}

    fn phase_completed(&self, _stream: &str, _phase: Phase, _elapsed: Duration) {}

    fn range_resolved(&self, _stream: &str, _range: BlockRange, _checkpoint: Option<u64>) {}

    fn block_received(&self, _stream: &str, _block: u64) {}

    fn block_ignored(&self, _stream: &str, _block: u64, _reason: &str) {}

    fn completed(&self, _stream: &str, _outcome: &Result<ProcessingResult, SessionError>) {}
}

/// Observer that writes through the crate's log helpers
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl SessionObserver for LoggingObserver {
    fn state_changed(&self, stream: &str, state: SessionState) {
        logging::log_debug(&format!("[{}] Session state: {}", stream, state));
    }

    fn phase_completed(&self, stream: &str, phase: Phase, elapsed: Duration) {
        logging::log_info(&format!("[{}] {}: {:?}", stream, phase, elapsed));
    }

    fn range_resolved(&self, stream: &str, range: BlockRange, checkpoint: Option<u64>) {
        let checkpoint = checkpoint.map_or_else(|| "none".to_string(), |c| c.to_string());
        logging::log_info(&format!(
            "[{}] Processing events for blocks between start ({}) & end ({}), {} blocks, last checkpoint: {}",
            stream,
            range.start,
            range.end,
            range.len(),
            checkpoint
        ));
    }

    fn block_received(&self, stream: &str, block: u64) {
        logging::log_info(&format!("[{}] Event received for block {}", stream, block));
    }

    fn block_ignored(&self, stream: &str, block: u64, reason: &str) {
        logging::log_warning(&format!("[{}] Ignoring block {}: {}", stream, block, reason));
    }

    fn completed(&self, stream: &str, outcome: &Result<ProcessingResult, SessionError>) {
        match outcome {
            Ok(result) if result.block_events_processed.is_empty() => {
                logging::log_info(&format!(
                    "[{}] Nothing to process between {} and {}",
                    stream, result.start_block, result.end_block
                ));
            }
            Ok(result) => {
                logging::log_info(&format!(
                    "[{}] Processed {} block events, checkpoint now {}",
                    stream,
                    result.block_events_processed.len(),
                    result.end_block
                ));
            }
            Err(e) => logging::log_error(&format!("[{}] Session failed: {}", stream, e)),
        }
    }
}
