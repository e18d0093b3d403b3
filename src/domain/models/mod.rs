pub mod block_range;
pub mod feed_event;
pub mod request;
pub mod result;

pub use block_range::BlockRange;
pub use feed_event::{FeedEvent, TerminationReason};
pub use request::{ConnectionProfile, Credentials, ProcessingRequest, StoreEndpoint, ValidatedRequest};
pub use result::ProcessingResult;
