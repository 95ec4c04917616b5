use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::LanguageError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Language(#[from] LanguageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Language, LocalizedText};

    #[test]
    fn wraps_layer_errors_transparently() {
        let text = LocalizedText::from_pairs([(Language::En, "only english")]);
        let err: Error = text.resolve(Language::Hi).unwrap_err().into();
        assert_eq!(err.to_string(), "no translation for language 'hi'");
    }
}
