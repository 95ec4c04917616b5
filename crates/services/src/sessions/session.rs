use chrono::{DateTime, Utc};

use lesson_core::model::{Language, LanguageError, Module, ModuleId, Step, StepKind};

use super::progress::SessionProgress;
use crate::error::SessionError;
use crate::interaction::InteractionEvent;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a session currently stands: on a step, or past the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active(usize),
    Complete,
}

impl SessionState {
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, SessionState::Complete)
    }

    /// The active step index, or `None` once complete.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            SessionState::Active(i) => Some(i),
            SessionState::Complete => None,
        }
    }
}

/// Identifies the step a narration or tutor call was issued for.
///
/// Compare against the session's current stamp before applying a response
/// that resolved later; a non-matching stamp means the step changed in the
/// meantime and the response is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStamp(Option<usize>);

/// Outcome of submitting an interaction event.
///
/// `NotMatched` is a normal result, not an error: the host may give negative
/// feedback, and no progress write occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    Advanced { state: SessionState },
    NotMatched,
}

impl InteractionOutcome {
    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(self, InteractionOutcome::Advanced { .. })
    }
}

/// Current step texts resolved for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContent<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub instruction: &'a str,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Context string handed to the tutor once the module is complete.
const MODULE_COMPLETE_CONTEXT: &str = "The module is complete. The user can restart the lesson.";

/// In-memory step progression for one active module session.
///
/// Holds the volatile step index and language selection; persistence goes
/// through [`super::LessonLoopService`], which also decides when a transition
/// is written back. Browsing with [`LessonSession::go_to`] never persists.
pub struct LessonSession {
    module: Module,
    current: usize,
    language: Language,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl LessonSession {
    /// Create a session, resuming from a saved completed-step count.
    ///
    /// The saved value is honored when `0 < saved <= len(steps)`; anything
    /// else (including a count from a module whose step list has since
    /// shrunk) starts the session at the first step. A saved count equal to
    /// the step count resumes directly in the complete state.
    #[must_use]
    pub fn resume(
        module: Module,
        saved_progress: u32,
        language: Language,
        started_at: DateTime<Utc>,
    ) -> Self {
        let saved = usize::try_from(saved_progress).unwrap_or(0);
        let current = if saved > 0 && saved <= module.step_count() {
            saved
        } else {
            0
        };

        Self {
            module,
            current,
            language,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn module(&self) -> &Module {
        &self.module
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        self.module.id()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.current >= self.module.step_count() {
            SessionState::Complete
        } else {
            SessionState::Active(self.current)
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state().is_complete()
    }

    /// The current step index; equals the step count once complete.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.module.step(self.current)
    }

    #[must_use]
    pub fn stamp(&self) -> StepStamp {
        StepStamp(self.state().index())
    }

    /// Explicit "next". Only legal on info steps; interaction steps advance
    /// through [`LessonSession::submit`] alone.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` past the last step and
    /// `SessionError::InteractionRequired` on an interaction step.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<SessionState, SessionError> {
        let Some(step) = self.current_step() else {
            return Err(SessionError::Completed);
        };
        if step.kind() == StepKind::Interaction {
            return Err(SessionError::InteractionRequired);
        }
        Ok(self.step_forward(now))
    }

    /// Evaluate an interaction event against the current step.
    ///
    /// A match advances the session exactly once. Everything else is
    /// `NotMatched`: a wrong part, the connection sentinel on a part step,
    /// or any event while complete or on an info step.
    pub fn submit(&mut self, event: &InteractionEvent, now: DateTime<Utc>) -> InteractionOutcome {
        let Some(step) = self.current_step() else {
            return InteractionOutcome::NotMatched;
        };
        if step.kind() != StepKind::Interaction {
            return InteractionOutcome::NotMatched;
        }

        let matched = match event {
            InteractionEvent::PartClicked(part) => step.target_part_id() == Some(part),
            InteractionEvent::ConnectionMade => step.required_connection().is_some(),
        };

        if matched {
            InteractionOutcome::Advanced {
                state: self.step_forward(now),
            }
        } else {
            InteractionOutcome::NotMatched
        }
    }

    /// Reset to the first step. Legal from any state.
    pub fn restart(&mut self) -> SessionState {
        self.current = 0;
        self.completed_at = None;
        self.state()
    }

    /// Reposition for browsing the step list. Does not touch persisted
    /// progress; only forward transitions and restart do.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StepOutOfRange` when the index does not name a
    /// step.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.module.step_count() {
            return Err(SessionError::StepOutOfRange {
                index,
                len: self.module.step_count(),
            });
        }
        self.current = index;
        Ok(())
    }

    fn step_forward(&mut self, now: DateTime<Utc>) -> SessionState {
        self.current += 1;
        if self.current >= self.module.step_count() {
            self.completed_at = Some(now);
        }
        self.state()
    }

    //
    // ─── VIEWS ─────────────────────────────────────────────────────────────
    //

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.module.step_count();
        SessionProgress {
            total,
            completed: self.current,
            remaining: total.saturating_sub(self.current),
            fraction: self.progress_fraction(),
            is_complete: self.is_complete(),
        }
    }

    /// Completed fraction for progress-bar rendering: `current / len` while
    /// active, `1.0` once complete. Whether the in-flight step counts as
    /// started is a presentation choice left to the caller.
    #[must_use]
    pub fn progress_fraction(&self) -> f32 {
        let total = self.module.step_count();
        if total == 0 || self.is_complete() {
            return 1.0;
        }
        self.current as f32 / total as f32
    }

    /// The current step's texts resolved for the given language, or `None`
    /// once complete.
    ///
    /// # Errors
    ///
    /// Returns `LanguageError::Unsupported` for a language the catalog never
    /// declared.
    pub fn content(&self, language: Language) -> Result<Option<StepContent<'_>>, LanguageError> {
        let Some(step) = self.current_step() else {
            return Ok(None);
        };
        Ok(Some(StepContent {
            title: step.title().resolve(language)?,
            description: step.description().resolve(language)?,
            instruction: step.instruction().resolve(language)?,
        }))
    }

    /// Texts for the session's selected language.
    ///
    /// # Errors
    ///
    /// Returns `LanguageError::Unsupported` for an undeclared language.
    pub fn current_content(&self) -> Result<Option<StepContent<'_>>, LanguageError> {
        self.content(self.language)
    }

    /// Context string for the tutor: "title: description" of the current
    /// step, or a fixed completion sentence.
    ///
    /// # Errors
    ///
    /// Returns `LanguageError::Unsupported` for an undeclared language.
    pub fn tutor_context(&self, language: Language) -> Result<String, LanguageError> {
        match self.content(language)? {
            Some(content) => Ok(format!("{}: {}", content.title, content.description)),
            None => Ok(MODULE_COMPLETE_CONTEXT.to_string()),
        }
    }
}

impl std::fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonSession")
            .field("module_id", self.module.id())
            .field("steps_len", &self.module.step_count())
            .field("current", &self.current)
            .field("language", &self.language)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
