//! Checkpoint-resume processing
//!
//! One `ProcessingSession` per invocation: resolve the block range from the
//! checkpoint, stream it from the block feed, and advance the checkpoint once
//! the feed has shut down gracefully.

pub mod session;

pub use session::{
    LoggingObserver, Phase, ProcessingSession, SessionHandle, SessionObserver, SessionState,
};
