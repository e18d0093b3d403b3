pub mod connection;
pub mod entities;
pub mod error;
pub mod repositories;

pub use connection::DbPool;
pub use error::DbError;
pub use repositories::CheckpointRepository;
