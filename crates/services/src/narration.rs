//! Fire-and-forget narration of the current instruction.

use lesson_core::model::LanguageError;

use crate::sessions::LessonSession;

/// Speech output for step instructions.
///
/// Calls are fire-and-forget: nothing feeds back into step state, and a
/// narration superseded by a newer step is simply cancelled.
pub trait Narrator: Send + Sync {
    /// Queue the given text for speech.
    fn speak(&self, text: &str);

    /// Stop any in-flight speech.
    fn cancel(&self);
}

/// Narrator that swallows everything, for muted playback and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn speak(&self, _text: &str) {}

    fn cancel(&self) {}
}

/// Speak the session's current instruction in its selected language,
/// cancelling whatever was still playing for the previous step. Does nothing
/// once the module is complete.
///
/// # Errors
///
/// Returns `LanguageError::Unsupported` for an undeclared language.
pub fn narrate_current(
    narrator: &dyn Narrator,
    session: &LessonSession,
) -> Result<(), LanguageError> {
    narrator.cancel();
    if let Some(content) = session.current_content()? {
        narrator.speak(content.instruction);
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
