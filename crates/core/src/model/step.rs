use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::{PartId, StepId, TerminalId};
use crate::model::text::{Language, LocalizedText};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepError {
    #[error("step '{step}' declares both a target part and a required connection")]
    AmbiguousSuccessCondition { step: StepId },

    #[error("step '{step}' is marked interaction but declares no success condition")]
    MissingSuccessCondition { step: StepId },

    #[error("info step '{step}' declares a required connection")]
    ConnectionOnInfoStep { step: StepId },

    #[error("step '{step}' field '{field}' has no '{language}' translation")]
    MissingTranslation {
        step: StepId,
        field: &'static str,
        language: Language,
    },
}

//
// ─── CONNECTION ────────────────────────────────────────────────────────────────
//

/// An unordered pair of terminals the learner must wire together.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Connection {
    pub from: TerminalId,
    pub to: TerminalId,
}

impl Connection {
    #[must_use]
    pub fn new(from: TerminalId, to: TerminalId) -> Self {
        Self { from, to }
    }

    /// Returns true if the pair `(a, b)` completes this connection in either
    /// order.
    #[must_use]
    pub fn links(&self, a: &TerminalId, b: &TerminalId) -> bool {
        (self.from == *a && self.to == *b) || (self.from == *b && self.to == *a)
    }

    /// Returns true if the terminal is one of this connection's endpoints.
    #[must_use]
    pub fn involves(&self, terminal: &TerminalId) -> bool {
        self.from == *terminal || self.to == *terminal
    }
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

/// How a step is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Pure narration; advanced only by an explicit "next" action.
    Info,
    /// Advanced only by a matching interaction event.
    Interaction,
}

/// Wire shape of a step as it appears in catalog data.
///
/// `kind` is optional on the wire: when absent it derives to `interaction`
/// exactly when a success condition is present. An explicit `info` kind with a
/// `targetPartId` is legal; the target then acts as a focus hint only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StepDraft {
    pub id: StepId,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub instruction: LocalizedText,
    #[serde(default)]
    pub kind: Option<StepKind>,
    #[serde(default)]
    pub target_part_id: Option<PartId>,
    #[serde(default)]
    pub required_connection: Option<Connection>,
}

impl StepDraft {
    /// Validate the draft into a domain `Step`.
    ///
    /// # Errors
    ///
    /// Returns `StepError` if the success condition is ambiguous or missing,
    /// a connection is attached to an info step, or any text field lacks one
    /// of `required_languages`.
    pub fn validate(self, required_languages: &[Language]) -> Result<Step, StepError> {
        for (field, text) in [
            ("title", &self.title),
            ("description", &self.description),
            ("instruction", &self.instruction),
        ] {
            for &language in required_languages {
                if !text.has(language) {
                    return Err(StepError::MissingTranslation {
                        step: self.id.clone(),
                        field,
                        language,
                    });
                }
            }
        }

        if self.target_part_id.is_some() && self.required_connection.is_some() {
            return Err(StepError::AmbiguousSuccessCondition { step: self.id });
        }

        let has_condition = self.target_part_id.is_some() || self.required_connection.is_some();
        let kind = self.kind.unwrap_or(if has_condition {
            StepKind::Interaction
        } else {
            StepKind::Info
        });

        match kind {
            StepKind::Interaction if !has_condition => {
                return Err(StepError::MissingSuccessCondition { step: self.id });
            }
            StepKind::Info if self.required_connection.is_some() => {
                return Err(StepError::ConnectionOnInfoStep { step: self.id });
            }
            _ => {}
        }

        Ok(Step {
            id: self.id,
            title: self.title,
            description: self.description,
            instruction: self.instruction,
            kind,
            target_part_id: self.target_part_id,
            required_connection: self.required_connection,
        })
    }
}

/// One unit of lesson content with an optional success condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    id: StepId,
    title: LocalizedText,
    description: LocalizedText,
    instruction: LocalizedText,
    kind: StepKind,
    target_part_id: Option<PartId>,
    required_connection: Option<Connection>,
}

impl Step {
    #[must_use]
    pub fn id(&self) -> &StepId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &LocalizedText {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &LocalizedText {
        &self.description
    }

    #[must_use]
    pub fn instruction(&self) -> &LocalizedText {
        &self.instruction
    }

    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    #[must_use]
    pub fn is_interaction(&self) -> bool {
        self.kind == StepKind::Interaction
    }

    /// The single part whose click satisfies this step, when it is an
    /// interaction step with a part-click condition.
    #[must_use]
    pub fn target_part_id(&self) -> Option<&PartId> {
        self.target_part_id.as_ref()
    }

    #[must_use]
    pub fn required_connection(&self) -> Option<&Connection> {
        self.required_connection.as_ref()
    }

    /// The part a surface should visually focus for this step, regardless of
    /// kind. For info steps the target acts purely as this hint.
    #[must_use]
    pub fn focus_hint(&self) -> Option<&PartId> {
        self.target_part_id.as_ref()
    }
}

impl StepDraft {
    /// Iterates over every text field, for catalog-wide language checks.
    pub(crate) fn texts(&self) -> impl Iterator<Item = &LocalizedText> {
        [&self.title, &self.description, &self.instruction].into_iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn text(en: &str) -> LocalizedText {
        LocalizedText::from_pairs([(Language::En, en)])
    }

    fn draft(id: &str) -> StepDraft {
        StepDraft {
            id: StepId::new(id),
            title: text("Title"),
            description: text("Description"),
            instruction: text("Instruction"),
            kind: None,
            target_part_id: None,
            required_connection: None,
        }
    }

    #[test]
    fn kind_derives_to_interaction_with_target() {
        let mut d = draft("step1");
        d.target_part_id = Some(PartId::new("stator"));
        let step = d.validate(&[Language::En]).unwrap();
        assert_eq!(step.kind(), StepKind::Interaction);
        assert_eq!(step.target_part_id().unwrap().as_str(), "stator");
    }

    #[test]
    fn kind_derives_to_info_without_condition() {
        let step = draft("intro").validate(&[Language::En]).unwrap();
        assert_eq!(step.kind(), StepKind::Info);
        assert!(step.target_part_id().is_none());
    }

    #[test]
    fn info_step_keeps_target_as_focus_hint() {
        let mut d = draft("intro_stator");
        d.kind = Some(StepKind::Info);
        d.target_part_id = Some(PartId::new("stator"));
        let step = d.validate(&[Language::En]).unwrap();
        assert_eq!(step.kind(), StepKind::Info);
        assert_eq!(step.focus_hint().unwrap().as_str(), "stator");
    }

    #[test]
    fn rejects_both_target_and_connection() {
        let mut d = draft("w_step1");
        d.target_part_id = Some(PartId::new("wire_phase"));
        d.required_connection = Some(Connection::new(
            TerminalId::new("source_phase"),
            TerminalId::new("switch_in"),
        ));
        let err = d.validate(&[Language::En]).unwrap_err();
        assert!(matches!(err, StepError::AmbiguousSuccessCondition { .. }));
    }

    #[test]
    fn rejects_explicit_interaction_without_condition() {
        let mut d = draft("bad");
        d.kind = Some(StepKind::Interaction);
        let err = d.validate(&[Language::En]).unwrap_err();
        assert!(matches!(err, StepError::MissingSuccessCondition { .. }));
    }

    #[test]
    fn rejects_connection_on_info_step() {
        let mut d = draft("bad");
        d.kind = Some(StepKind::Info);
        d.required_connection = Some(Connection::new(
            TerminalId::new("a"),
            TerminalId::new("b"),
        ));
        let err = d.validate(&[Language::En]).unwrap_err();
        assert!(matches!(err, StepError::ConnectionOnInfoStep { .. }));
    }

    #[test]
    fn rejects_missing_translation() {
        let mut d = draft("step1");
        d.title = LocalizedText::from_pairs([(Language::En, "only english")]);
        let err = d.validate(&[Language::En, Language::Hi]).unwrap_err();
        assert_eq!(
            err,
            StepError::MissingTranslation {
                step: StepId::new("step1"),
                field: "title",
                language: Language::Hi,
            }
        );
    }

    #[test]
    fn connection_links_either_order() {
        let conn = Connection::new(TerminalId::new("source_phase"), TerminalId::new("switch_in"));
        let a = TerminalId::new("source_phase");
        let b = TerminalId::new("switch_in");
        assert!(conn.links(&a, &b));
        assert!(conn.links(&b, &a));
        assert!(!conn.links(&a, &a));
        assert!(conn.involves(&a));
        assert!(!conn.involves(&TerminalId::new("bulb_in")));
    }
}
