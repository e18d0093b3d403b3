use crate::domain::models::{BlockRange, FeedEvent, TerminationReason};

/// What the session should do after a feed event
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    /// Block recorded, keep listening
    Recorded(u64),
    /// Last block of the range recorded, the feed should be closed
    ReachedEnd(u64),
    /// Block outside the range, not recorded
    OutOfRange(u64),
    /// Graceful shutdown after the end was reached
    Drained,
    /// The feed stopped without reaching the end, or failed
    Failed(String),
    /// Event arrived after the feed had already terminated
    AfterTermination,
}

/// Records block arrivals for one subscription until it terminates
#[derive(Debug)]
pub(crate) struct BlockAccumulator {
    range: BlockRange,
    processed: Vec<u64>,
    close_requested: bool,
    terminated: bool,
}

impl BlockAccumulator {
    pub(crate) fn new(range: BlockRange) -> Self {
        Self {
            range,
            processed: Vec::new(),
            close_requested: false,
            terminated: false,
        }
    }

    pub(crate) fn on_event(&mut self, event: FeedEvent) -> Step {
        if self.terminated {
            return Step::AfterTermination;
        }

        match event {
            FeedEvent::BlockArrived(block) => {
                if !self.range.contains(block) {
                    return Step::OutOfRange(block);
                }
                self.processed.push(block);
                if self.range.is_end(block) && !self.close_requested {
                    self.close_requested = true;
                    Step::ReachedEnd(block)
                } else {
                    Step::Recorded(block)
                }
            }
            FeedEvent::Terminated(TerminationReason::Shutdown) => {
                self.terminated = true;
                if self.close_requested {
                    Step::Drained
                } else {
                    Step::Failed(format!(
                        "block feed shut down before block {} arrived",
                        self.range.end
                    ))
                }
            }
            FeedEvent::Terminated(TerminationReason::Error(details)) => {
                self.terminated = true;
                Step::Failed(details)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn processed(&self) -> &[u64] {
        &self.processed
    }

    pub(crate) fn into_processed(self) -> Vec<u64> {
        self.processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(n: u64) -> FeedEvent {
        FeedEvent::BlockArrived(n)
    }

    fn shutdown() -> FeedEvent {
        FeedEvent::Terminated(TerminationReason::Shutdown)
    }

    #[test]
    fn closes_once_on_end_block_then_drains() {
        let mut accumulator = BlockAccumulator::new(BlockRange::new(5, 7));
        assert_eq!(accumulator.on_event(block(5)), Step::Recorded(5));
        assert_eq!(accumulator.on_event(block(6)), Step::Recorded(6));
        assert_eq!(accumulator.on_event(block(7)), Step::ReachedEnd(7));
        // at-least-once delivery may repeat the end block
        assert_eq!(accumulator.on_event(block(7)), Step::Recorded(7));
        assert_eq!(accumulator.on_event(shutdown()), Step::Drained);
        assert_eq!(accumulator.processed(), &[5, 6, 7, 7]);
    }

    #[test]
    fn keeps_arrival_order_for_out_of_order_delivery() {
        let mut accumulator = BlockAccumulator::new(BlockRange::new(5, 7));
        accumulator.on_event(block(6));
        accumulator.on_event(block(5));
        assert_eq!(accumulator.on_event(block(7)), Step::ReachedEnd(7));
        assert_eq!(accumulator.into_processed(), vec![6, 5, 7]);
    }

    #[test]
    fn ignores_blocks_outside_range() {
        let mut accumulator = BlockAccumulator::new(BlockRange::new(5, 7));
        assert_eq!(accumulator.on_event(block(4)), Step::OutOfRange(4));
        assert_eq!(accumulator.on_event(block(8)), Step::OutOfRange(8));
        assert!(accumulator.processed().is_empty());
    }

    #[test]
    fn unrequested_shutdown_is_a_failure() {
        let mut accumulator = BlockAccumulator::new(BlockRange::new(5, 7));
        accumulator.on_event(block(5));
        assert!(matches!(accumulator.on_event(shutdown()), Step::Failed(_)));
    }

    #[test]
    fn error_termination_fails_with_details() {
        let mut accumulator = BlockAccumulator::new(BlockRange::new(5, 7));
        let step = accumulator.on_event(FeedEvent::Terminated(TerminationReason::Error(
            "peer disconnected".to_string(),
        )));
        assert_eq!(step, Step::Failed("peer disconnected".to_string()));
    }

    #[test]
    fn events_after_termination_are_ignored() {
        let mut accumulator = BlockAccumulator::new(BlockRange::new(5, 5));
        assert_eq!(accumulator.on_event(block(5)), Step::ReachedEnd(5));
        assert_eq!(accumulator.on_event(shutdown()), Step::Drained);
        assert_eq!(accumulator.on_event(block(5)), Step::AfterTermination);
        assert_eq!(accumulator.on_event(shutdown()), Step::AfterTermination);
        assert_eq!(accumulator.processed(), &[5]);
    }
}
