use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── LANGUAGE ──────────────────────────────────────────────────────────────────
//

/// Display language for lesson content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
}

impl Language {
    /// Returns the two-letter language code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error type for parsing a language code from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError {
    code: String,
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language code: {}", self.code)
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            other => Err(ParseLanguageError {
                code: other.to_string(),
            }),
        }
    }
}

//
// ─── LOCALIZED TEXT ────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("no translation for language '{0}'")]
    Unsupported(Language),
}

/// A display string keyed by language.
///
/// Catalog validation guarantees that every language used anywhere in a
/// catalog resolves for every text field, so `resolve` failing at runtime
/// means the caller requested a language the catalog never declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Language, String>);

impl LocalizedText {
    #[must_use]
    pub fn new(translations: BTreeMap<Language, String>) -> Self {
        Self(translations)
    }

    /// Builds a text from `(language, string)` pairs.
    #[must_use]
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (Language, S)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(lang, s)| (lang, s.into()))
                .collect(),
        )
    }

    /// Resolves the string for the given language.
    ///
    /// # Errors
    ///
    /// Returns `LanguageError::Unsupported` if no translation exists. There is
    /// no fallback chain; callers are expected to request declared languages.
    pub fn resolve(&self, lang: Language) -> Result<&str, LanguageError> {
        self.0
            .get(&lang)
            .map(String::as_str)
            .ok_or(LanguageError::Unsupported(lang))
    }

    /// Returns true if a translation exists for the given language.
    #[must_use]
    pub fn has(&self, lang: Language) -> bool {
        self.0.contains_key(&lang)
    }

    /// Iterates over the languages this text is translated into.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.0.keys().copied()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
