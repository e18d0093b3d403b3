use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use std::fmt;

use crate::infrastructure::checkpoint::{CheckpointError, CheckpointStore};
use crate::infrastructure::persistence::entities::checkpoint;
use crate::infrastructure::persistence::error::DbError;

/// Repository for checkpoint operations
#[derive(Clone)]
pub struct CheckpointRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for CheckpointRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointRepository").finish_non_exhaustive()
    }
}

impl CheckpointRepository {
    /// Create a new CheckpointRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get the last processed block for a stream
    pub async fn get_last_processed_block(&self, stream_name: &str) -> Result<Option<u64>, DbError> {
        let result = checkpoint::Entity::find_by_id(stream_name.to_string())
            .one(&self.conn)
            .await?;

        result
            .map(|row| {
                u64::try_from(row.height).map_err(|_| {
                    DbError::InvalidValue(format!(
                        "negative checkpoint {} stored for stream {}",
                        row.height, stream_name
                    ))
                })
            })
            .transpose()
    }

    /// Insert or update the checkpoint for a stream
    pub async fn save_checkpoint(&self, stream_name: &str, height: u64) -> Result<(), DbError> {
        let height = i64::try_from(height)
            .map_err(|_| DbError::InvalidValue(format!("checkpoint {} out of range", height)))?;

        let row = checkpoint::ActiveModel {
            stream_name: Set(stream_name.to_string()),
            height: Set(height),
            last_updated_at: Set(Utc::now().into()),
        };

        checkpoint::Entity::insert(row)
            .on_conflict(
                OnConflict::column(checkpoint::Column::StreamName)
                    .update_columns([checkpoint::Column::Height, checkpoint::Column::LastUpdatedAt])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for CheckpointRepository {
    async fn get(&self, stream_name: &str) -> Result<Option<u64>, CheckpointError> {
        Ok(self.get_last_processed_block(stream_name).await?)
    }

    async fn set(&self, stream_name: &str, value: u64) -> Result<(), CheckpointError> {
        Ok(self.save_checkpoint(stream_name, value).await?)
    }
}
