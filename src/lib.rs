//! Checkpoint-resume block indexer for permissioned ledgers.
//!
//! Reads the last processed block for a channel, streams the blocks that
//! followed it up to the chain tip (or explicit bounds), and records the new
//! checkpoint once the stream has been fully drained.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod utils;

pub use application::{ProcessingSession, SessionHandle, SessionObserver, SessionState};
pub use domain::errors::SessionError;
pub use domain::models::{
    BlockRange, ConnectionProfile, Credentials, ProcessingRequest, ProcessingResult, StoreEndpoint,
};
