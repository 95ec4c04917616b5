mod progress;
mod session;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use session::{
    InteractionOutcome, LessonSession, SessionState, StepContent, StepStamp,
};
pub use workflow::LessonLoopService;
