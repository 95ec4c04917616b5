#![forbid(unsafe_code)]

pub mod error;
pub mod interaction;
pub mod narration;
pub mod sessions;
pub mod surface;
pub mod tutor;

pub use lesson_core::Clock;

pub use error::{SessionError, TutorError};
pub use interaction::{CONNECTION_MADE_SENTINEL, InteractionEvent};
pub use narration::{Narrator, NullNarrator, narrate_current};
pub use sessions::{
    InteractionOutcome, LessonLoopService, LessonSession, SessionProgress, SessionState,
    StepContent, StepStamp,
};
pub use surface::{FocusHint, InteractionSurface, Selection, TerminalSelector};
pub use tutor::{
    CannedProvider, RemoteProvider, TutorConfig, TutorProvider, TutorReply, TutorService,
};
