//! Read-only lesson catalog: validated modules keyed by id.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::{Language, Module, ModuleDraft, ModuleError, ModuleId};

/// JSON for the three built-in vocational modules (bilingual en/hi).
const BUILTIN_MODULES: &str = include_str!("../data/modules.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("module '{0}' not found")]
    NotFound(ModuleId),

    #[error("catalog entry '{key}' declares mismatched module id '{declared}'")]
    IdMismatch { key: ModuleId, declared: ModuleId },

    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error("catalog data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static, language-agnostic definition of modules and their ordered steps.
///
/// Validated fully at load time: a malformed entry fails construction rather
/// than surfacing as an unplayable lesson later.
#[derive(Debug, Clone)]
pub struct Catalog {
    modules: BTreeMap<ModuleId, Module>,
    languages: Vec<Language>,
}

impl Catalog {
    /// Parse and validate a catalog from its JSON wire shape: a mapping from
    /// module id to module definition.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and the validation
    /// variants for entries that violate the data model invariants.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let drafts: BTreeMap<ModuleId, ModuleDraft> = serde_json::from_str(json)?;
        Self::from_drafts(drafts)
    }

    /// The catalog shipped with the product: motor assembly, household
    /// wiring, and PCB soldering.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded asset fails validation.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_MODULES)
    }

    /// Validate drafts into a catalog.
    ///
    /// Every language used anywhere in the catalog must resolve for every
    /// text field of every module and step, so the required set is the union
    /// across all drafts before any of them is validated.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on the first violated invariant.
    pub fn from_drafts(
        drafts: BTreeMap<ModuleId, ModuleDraft>,
    ) -> Result<Self, CatalogError> {
        let mut languages = BTreeSet::new();
        for draft in drafts.values() {
            for text in [&draft.title, &draft.description] {
                languages.extend(text.languages());
            }
            for step in &draft.steps {
                for text in step.texts() {
                    languages.extend(text.languages());
                }
            }
        }
        let languages: Vec<Language> = languages.into_iter().collect();

        let mut modules = BTreeMap::new();
        for (key, draft) in drafts {
            if draft.id != key {
                return Err(CatalogError::IdMismatch {
                    key,
                    declared: draft.id,
                });
            }
            let module = draft.validate(&languages)?;
            modules.insert(key, module);
        }

        Ok(Self { modules, languages })
    }

    /// Look up a module by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id.
    pub fn module(&self, id: &ModuleId) -> Result<&Module, CatalogError> {
        self.modules
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Every language declared anywhere in this catalog. All module and step
    /// texts resolve for each of these.
    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn module_ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SceneType, StepKind};

    #[test]
    fn builtin_catalog_validates() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.languages(), &[Language::En, Language::Hi]);
    }

    #[test]
    fn builtin_motor_module_shape() {
        let catalog = Catalog::builtin().unwrap();
        let motor = catalog.module(&ModuleId::new("1")).unwrap();
        assert_eq!(motor.scene_type(), SceneType::Motor);
        assert_eq!(motor.step_count(), 6);

        // Three intro focus steps, then three click-the-part steps.
        assert_eq!(motor.step(0).unwrap().kind(), StepKind::Info);
        assert_eq!(
            motor.step(0).unwrap().focus_hint().unwrap().as_str(),
            "stator"
        );
        assert_eq!(motor.step(3).unwrap().kind(), StepKind::Interaction);
        assert_eq!(
            motor.step(3).unwrap().target_part_id().unwrap().as_str(),
            "stator"
        );
    }

    #[test]
    fn builtin_wiring_steps_use_connections() {
        let catalog = Catalog::builtin().unwrap();
        let wiring = catalog.module(&ModuleId::new("2")).unwrap();
        let step = wiring.step(3).unwrap();
        assert!(step.is_interaction());
        assert!(step.target_part_id().is_none());
        let conn = step.required_connection().unwrap();
        assert_eq!(conn.from.as_str(), "source_phase");
        assert_eq!(conn.to.as_str(), "switch_in");
    }

    #[test]
    fn unknown_module_is_not_found() {
        let catalog = Catalog::builtin().unwrap();
        let err = catalog.module(&ModuleId::new("99")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn language_union_spans_modules() {
        // Module "a" is English-only, module "b" is bilingual. The union
        // {en, hi} then applies to "a" as well, which must fail.
        let json = r#"{
            "a": {
                "id": "a",
                "title": { "en": "A" },
                "description": { "en": "A" },
                "sceneType": "motor",
                "steps": [{
                    "id": "s1",
                    "title": { "en": "T" },
                    "description": { "en": "D" },
                    "instruction": { "en": "I" },
                    "targetPartId": "stator"
                }]
            },
            "b": {
                "id": "b",
                "title": { "en": "B", "hi": "B" },
                "description": { "en": "B", "hi": "B" },
                "sceneType": "pcb",
                "steps": [{
                    "id": "s1",
                    "title": { "en": "T", "hi": "T" },
                    "description": { "en": "D", "hi": "D" },
                    "instruction": { "en": "I", "hi": "I" },
                    "targetPartId": "board"
                }]
            }
        }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Module(ModuleError::MissingTranslation { .. })
        ));
    }

    #[test]
    fn rejects_key_id_mismatch() {
        let json = r#"{
            "1": {
                "id": "2",
                "title": { "en": "A" },
                "description": { "en": "A" },
                "sceneType": "motor",
                "steps": [{
                    "id": "s1",
                    "title": { "en": "T" },
                    "description": { "en": "D" },
                    "instruction": { "en": "I" },
                    "targetPartId": "stator"
                }]
            }
        }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::IdMismatch { .. }));
    }

    #[test]
    fn rejects_zero_step_module() {
        let json = r#"{
            "1": {
                "id": "1",
                "title": { "en": "A" },
                "description": { "en": "A" },
                "sceneType": "motor",
                "steps": []
            }
        }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Module(ModuleError::Empty { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Catalog::from_json("not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
