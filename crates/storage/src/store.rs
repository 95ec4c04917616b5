//! Monotonic progress store with graceful degradation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lesson_core::Clock;
use lesson_core::model::ModuleId;

use crate::repository::{ProgressRecord, ProgressRepository, StorageError};

/// Durable per-module "furthest completed step" counter.
///
/// Writes are monotonic unless forced: a stale caller can never overwrite
/// further progress with a smaller number. When the backing repository fails,
/// the store flips into a session-scoped in-memory fallback instead of
/// failing the lesson; the degradation is logged once and is queryable via
/// [`ProgressStore::is_degraded`]. Store operations are therefore infallible
/// from the engine's point of view.
pub struct ProgressStore {
    repo: Arc<dyn ProgressRepository>,
    clock: Clock,
    fallback: Mutex<HashMap<ModuleId, u32>>,
    degraded: AtomicBool,
}

impl ProgressStore {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>, clock: Clock) -> Self {
        Self {
            repo,
            clock,
            fallback: Mutex::new(HashMap::new()),
            degraded: AtomicBool::new(false),
        }
    }

    /// Store backed only by process memory, for tests and prototyping.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(
            Arc::new(crate::repository::InMemoryProgressRepository::new()),
            clock,
        )
    }

    /// True once any backend operation has failed and the store switched to
    /// its in-memory fallback for the rest of the session.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Completed-step count for a module; 0 when never set.
    pub async fn get(&self, module_id: &ModuleId) -> u32 {
        if self.is_degraded() {
            return self.fallback_get(module_id);
        }
        match self.repo.load(module_id).await {
            Ok(Some(record)) => {
                self.fallback_put(module_id, record.completed_steps);
                record.completed_steps
            }
            Ok(None) => 0,
            Err(err) => {
                self.degrade(&err);
                self.fallback_get(module_id)
            }
        }
    }

    /// Write the completed-step count.
    ///
    /// Without `force` the write only happens when `value` is strictly
    /// greater than the stored one; a skipped write is a silent no-op, not an
    /// error. With `force` the value is written unconditionally (restart).
    pub async fn set(&self, module_id: &ModuleId, value: u32, force: bool) {
        let current = self.get(module_id).await;
        if !force && value <= current {
            return;
        }

        self.fallback_put(module_id, value);
        if self.is_degraded() {
            return;
        }

        let record = ProgressRecord {
            module_id: module_id.clone(),
            completed_steps: value,
            updated_at: self.clock.now(),
        };
        if let Err(err) = self.repo.save(&record).await {
            self.degrade(&err);
        }
    }

    /// Remove the record; subsequent `get` returns 0.
    pub async fn clear(&self, module_id: &ModuleId) {
        if let Ok(mut guard) = self.fallback.lock() {
            guard.remove(module_id);
        }
        if self.is_degraded() {
            return;
        }
        if let Err(err) = self.repo.clear(module_id).await {
            self.degrade(&err);
        }
    }

    fn degrade(&self, err: &StorageError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                "progress storage unavailable, continuing in memory for this session: {}",
                err
            );
        }
    }

    fn fallback_get(&self, module_id: &ModuleId) -> u32 {
        self.fallback
            .lock()
            .map(|guard| guard.get(module_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn fallback_put(&self, module_id: &ModuleId, value: u32) {
        if let Ok(mut guard) = self.fallback.lock() {
            guard.insert(module_id.clone(), value);
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lesson_core::time::fixed_clock;

    struct FailingRepository;

    #[async_trait]
    impl ProgressRepository for FailingRepository {
        async fn load(
            &self,
            _module_id: &ModuleId,
        ) -> Result<Option<ProgressRecord>, StorageError> {
            Err(StorageError::Connection("backend down".into()))
        }

        async fn save(&self, _record: &ProgressRecord) -> Result<(), StorageError> {
            Err(StorageError::Connection("backend down".into()))
        }

        async fn clear(&self, _module_id: &ModuleId) -> Result<(), StorageError> {
            Err(StorageError::Connection("backend down".into()))
        }
    }

    fn store() -> ProgressStore {
        ProgressStore::in_memory(fixed_clock())
    }

    #[tokio::test]
    async fn unset_module_reads_zero() {
        let store = store();
        assert_eq!(store.get(&ModuleId::new("1")).await, 0);
    }

    #[tokio::test]
    async fn writes_are_monotonic() {
        let store = store();
        let id = ModuleId::new("1");

        store.set(&id, 3, false).await;
        assert_eq!(store.get(&id).await, 3);

        // smaller and equal values are silently ignored
        store.set(&id, 1, false).await;
        store.set(&id, 3, false).await;
        assert_eq!(store.get(&id).await, 3);

        store.set(&id, 4, false).await;
        assert_eq!(store.get(&id).await, 4);
    }

    #[tokio::test]
    async fn force_overwrites_with_smaller_value() {
        let store = store();
        let id = ModuleId::new("1");

        store.set(&id, 5, false).await;
        store.set(&id, 0, true).await;
        assert_eq!(store.get(&id).await, 0);
    }

    #[tokio::test]
    async fn clear_resets_to_zero() {
        let store = store();
        let id = ModuleId::new("1");

        store.set(&id, 2, false).await;
        store.clear(&id).await;
        assert_eq!(store.get(&id).await, 0);
    }

    #[tokio::test]
    async fn modules_are_tracked_independently() {
        let store = store();
        store.set(&ModuleId::new("1"), 2, false).await;
        store.set(&ModuleId::new("2"), 5, false).await;
        assert_eq!(store.get(&ModuleId::new("1")).await, 2);
        assert_eq!(store.get(&ModuleId::new("2")).await, 5);
    }

    #[tokio::test]
    async fn backend_failure_degrades_instead_of_crashing() {
        let store = ProgressStore::new(Arc::new(FailingRepository), fixed_clock());
        let id = ModuleId::new("1");

        assert!(!store.is_degraded());
        assert_eq!(store.get(&id).await, 0);
        assert!(store.is_degraded());

        // session continues against the in-memory fallback, monotonic rules intact
        store.set(&id, 2, false).await;
        store.set(&id, 1, false).await;
        assert_eq!(store.get(&id).await, 2);

        store.set(&id, 0, true).await;
        assert_eq!(store.get(&id).await, 0);
    }

    #[tokio::test]
    async fn degraded_write_survives_for_session() {
        let store = ProgressStore::new(Arc::new(FailingRepository), fixed_clock());
        let id = ModuleId::new("2");

        store.set(&id, 4, false).await;
        assert!(store.is_degraded());
        assert_eq!(store.get(&id).await, 4);

        store.clear(&id).await;
        assert_eq!(store.get(&id).await, 0);
    }
}
