mod ids;
mod module;
mod step;
mod text;

pub use ids::{ModuleId, PartId, StepId, TerminalId};
pub use module::{Module, ModuleDraft, ModuleError, SceneType};
pub use step::{Connection, Step, StepDraft, StepError, StepKind};
pub use text::{Language, LanguageError, LocalizedText, ParseLanguageError};
