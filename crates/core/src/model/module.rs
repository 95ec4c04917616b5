use serde::Deserialize;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::{ModuleId, StepId};
use crate::model::step::{Step, StepDraft, StepError};
use crate::model::text::{Language, LocalizedText};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("module '{module}' has no steps")]
    Empty { module: ModuleId },

    #[error("module '{module}' declares step id '{step}' more than once")]
    DuplicateStepId { module: ModuleId, step: StepId },

    #[error("module '{module}' field '{field}' has no '{language}' translation")]
    MissingTranslation {
        module: ModuleId,
        field: &'static str,
        language: Language,
    },

    #[error("module '{module}': {source}")]
    Step {
        module: ModuleId,
        source: StepError,
    },
}

//
// ─── SCENE TYPE ────────────────────────────────────────────────────────────────
//

/// Selects which interaction surface variant renders a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneType {
    Motor,
    Wiring,
    Pcb,
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// Wire shape of a module as it appears in catalog data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleDraft {
    pub id: ModuleId,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub scene_type: SceneType,
    pub steps: Vec<StepDraft>,
}

impl ModuleDraft {
    /// Validate the draft into a domain `Module`.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError` for a zero-step module, duplicate step ids,
    /// missing module-level translations, or any step-level violation.
    pub fn validate(self, required_languages: &[Language]) -> Result<Module, ModuleError> {
        if self.steps.is_empty() {
            return Err(ModuleError::Empty { module: self.id });
        }

        for (field, text) in [("title", &self.title), ("description", &self.description)] {
            for &language in required_languages {
                if !text.has(language) {
                    return Err(ModuleError::MissingTranslation {
                        module: self.id.clone(),
                        field,
                        language,
                    });
                }
            }
        }

        let mut seen = BTreeSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.clone()) {
                return Err(ModuleError::DuplicateStepId {
                    module: self.id.clone(),
                    step: step.id.clone(),
                });
            }
        }

        let module_id = self.id;
        let steps = self
            .steps
            .into_iter()
            .map(|step| {
                step.validate(required_languages)
                    .map_err(|source| ModuleError::Step {
                        module: module_id.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Module {
            id: module_id,
            title: self.title,
            description: self.description,
            scene_type: self.scene_type,
            steps,
        })
    }
}

/// An ordered lesson composed of steps. Step order defines progression order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    title: LocalizedText,
    description: LocalizedText,
    scene_type: SceneType,
    steps: Vec<Step>,
}

impl Module {
    #[must_use]
    pub fn id(&self) -> &ModuleId {
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
    pub fn scene_type(&self) -> SceneType {
        self.scene_type
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps; also the index of the terminal "complete" state.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::PartId;

    fn text(en: &str) -> LocalizedText {
        LocalizedText::from_pairs([(Language::En, en)])
    }

    fn step_draft(id: &str, target: &str) -> StepDraft {
        StepDraft {
            id: StepId::new(id),
            title: text("Title"),
            description: text("Description"),
            instruction: text("Instruction"),
            kind: None,
            target_part_id: Some(PartId::new(target)),
            required_connection: None,
        }
    }

    fn module_draft(steps: Vec<StepDraft>) -> ModuleDraft {
        ModuleDraft {
            id: ModuleId::new("1"),
            title: text("Motor Assembly Basics"),
            description: text("Learn to fix a DC motor."),
            scene_type: SceneType::Motor,
            steps,
        }
    }

    #[test]
    fn validates_ordered_steps() {
        let module = module_draft(vec![
            step_draft("step1", "stator"),
            step_draft("step2", "rotor"),
        ])
        .validate(&[Language::En])
        .unwrap();

        assert_eq!(module.step_count(), 2);
        assert_eq!(module.step(0).unwrap().id().as_str(), "step1");
        assert_eq!(module.scene_type(), SceneType::Motor);
    }

    #[test]
    fn rejects_empty_module() {
        let err = module_draft(Vec::new()).validate(&[Language::En]).unwrap_err();
        assert!(matches!(err, ModuleError::Empty { .. }));
    }

    #[test]
    fn rejects_duplicate_step_ids() {
        let err = module_draft(vec![
            step_draft("step1", "stator"),
            step_draft("step1", "rotor"),
        ])
        .validate(&[Language::En])
        .unwrap_err();

        assert_eq!(
            err,
            ModuleError::DuplicateStepId {
                module: ModuleId::new("1"),
                step: StepId::new("step1"),
            }
        );
    }

    #[test]
    fn surfaces_step_violations_with_module_id() {
        let mut bad = step_draft("w_step1", "wire_phase");
        bad.required_connection = Some(crate::model::step::Connection::new(
            crate::model::ids::TerminalId::new("source_phase"),
            crate::model::ids::TerminalId::new("switch_in"),
        ));
        let err = module_draft(vec![bad]).validate(&[Language::En]).unwrap_err();
        assert!(matches!(
            err,
            ModuleError::Step {
                source: StepError::AmbiguousSuccessCondition { .. },
                ..
            }
        ));
    }

    #[test]
    fn rejects_module_missing_translation() {
        let mut draft = module_draft(vec![step_draft("step1", "stator")]);
        draft.title = LocalizedText::from_pairs([(Language::En, "only en")]);
        let err = draft.validate(&[Language::En, Language::Hi]).unwrap_err();
        assert!(matches!(
            err,
            ModuleError::MissingTranslation { field: "title", .. }
        ));
    }
}
