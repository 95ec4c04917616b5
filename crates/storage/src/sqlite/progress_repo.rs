use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use lesson_core::model::ModuleId;

use crate::repository::{ProgressRecord, ProgressRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load(&self, module_id: &ModuleId) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT completed_steps, updated_at
            FROM module_progress
            WHERE module_id = ?1
            ",
        )
        .bind(module_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let completed_steps: i64 = row
            .try_get("completed_steps")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let completed_steps = u32::try_from(completed_steps).map_err(|_| {
            StorageError::Serialization(format!(
                "completed_steps out of range: {completed_steps}"
            ))
        })?;

        let updated_at: String = row
            .try_get("updated_at")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|err| StorageError::Serialization(err.to_string()))?
            .with_timezone(&Utc);

        Ok(Some(ProgressRecord {
            module_id: module_id.clone(),
            completed_steps,
            updated_at,
        }))
    }

    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO module_progress (module_id, completed_steps, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(module_id) DO UPDATE SET
                completed_steps = excluded.completed_steps,
                updated_at = excluded.updated_at
            ",
        )
        .bind(record.module_id.as_str())
        .bind(i64::from(record.completed_steps))
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self, module_id: &ModuleId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM module_progress WHERE module_id = ?1")
            .bind(module_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
