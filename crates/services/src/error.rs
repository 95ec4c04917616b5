//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::catalog::CatalogError;
use lesson_core::model::LanguageError;

/// Errors emitted by lesson sessions.
///
/// A mismatched interaction is deliberately absent: the user clicking the
/// wrong part is an expected, frequent outcome and is modeled as
/// [`crate::sessions::InteractionOutcome::NotMatched`], not an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("module already complete")]
    Completed,

    #[error("current step requires a matching interaction, not a manual advance")]
    InteractionRequired,

    #[error("step index {index} out of range for module with {len} steps")]
    StepOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Language(#[from] LanguageError),
}

/// Errors emitted by the remote tutor provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("tutor is not configured")]
    Disabled,

    #[error("tutor returned an empty response")]
    EmptyResponse,

    #[error("tutor request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
