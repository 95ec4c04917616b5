use std::sync::Arc;

use lesson_core::Clock;
use lesson_core::catalog::Catalog;
use lesson_core::model::{Language, ModuleId};
use storage::store::ProgressStore;

use super::session::{InteractionOutcome, LessonSession, SessionState};
use crate::error::SessionError;
use crate::interaction::InteractionEvent;

/// Orchestrates session open and persisted step transitions.
///
/// The session itself transitions optimistically in memory first; the durable
/// write is best-effort through the monotonic [`ProgressStore`], which never
/// fails the user-facing transition (it degrades and warns instead).
#[derive(Clone)]
pub struct LessonLoopService {
    clock: Clock,
    catalog: Arc<Catalog>,
    store: Arc<ProgressStore>,
}

impl LessonLoopService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, store: Arc<ProgressStore>) -> Self {
        Self {
            clock,
            catalog,
            store,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// True once progress persistence has fallen back to memory.
    #[must_use]
    pub fn storage_degraded(&self) -> bool {
        self.store.is_degraded()
    }

    /// Open a session for a module, resuming from stored progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` for an unknown module id.
    pub async fn open_session(
        &self,
        module_id: &ModuleId,
        language: Language,
    ) -> Result<LessonSession, SessionError> {
        let module = self.catalog.module(module_id)?.clone();
        let saved = self.store.get(module_id).await;
        Ok(LessonSession::resume(
            module,
            saved,
            language,
            self.clock.now(),
        ))
    }

    /// Explicit "next" on an info step, persisting the new count.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` past the last step and
    /// `SessionError::InteractionRequired` on an interaction step.
    pub async fn advance(&self, session: &mut LessonSession) -> Result<SessionState, SessionError> {
        let state = session.advance(self.clock.now())?;
        self.persist(session).await;
        Ok(state)
    }

    /// Evaluate an interaction event; only a match persists.
    pub async fn submit(
        &self,
        session: &mut LessonSession,
        event: &InteractionEvent,
    ) -> InteractionOutcome {
        let outcome = session.submit(event, self.clock.now());
        if outcome.is_match() {
            self.persist(session).await;
        }
        outcome
    }

    /// Reset to the first step and force-persist zero, regardless of any
    /// further progress on record.
    pub async fn restart(&self, session: &mut LessonSession) -> SessionState {
        let state = session.restart();
        self.store.set(session.module_id(), 0, true).await;
        state
    }

    async fn persist(&self, session: &LessonSession) {
        let completed = u32::try_from(session.current_index()).unwrap_or(u32::MAX);
        self.store.set(session.module_id(), completed, false).await;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
