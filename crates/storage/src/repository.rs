use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lesson_core::model::ModuleId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a per-module progress counter.
///
/// One durable record per module id; `completed_steps` is the index of the
/// first not-yet-completed step. A missing record reads as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub module_id: ModuleId,
    pub completed_steps: u32,
    pub updated_at: DateTime<Utc>,
}

/// Repository contract for raw progress records.
///
/// Monotonicity and degraded-mode fallback live in [`crate::ProgressStore`];
/// implementations only provide atomic load/save/clear.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the record for a module, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load(&self, module_id: &ModuleId) -> Result<Option<ProgressRecord>, StorageError>;

    /// Persist a record in a single atomic write, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Remove the record for a module. Removing a missing record is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear(&self, module_id: &ModuleId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgressRepository {
    records: Arc<Mutex<HashMap<ModuleId, ProgressRecord>>>,
}

impl InMemoryProgressRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn load(&self, module_id: &ModuleId) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(module_id).cloned())
    }

    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(record.module_id.clone(), record.clone());
        Ok(())
    }

    async fn clear(&self, module_id: &ModuleId) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(module_id);
        Ok(())
    }
}
