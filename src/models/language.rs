use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::config::LIST_DELIMITER;

// ---------------------------------------------------------------------------
// Language — Print language of a variation
// ---------------------------------------------------------------------------

/// Language code of a printing.
///
/// Older catalog versions spelled languages out (`"English"`), so the long
/// names are accepted on input; output always uses the two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "EN", alias = "English")]
    En,
    #[serde(rename = "JP", alias = "Japanese")]
    Jp,
}

impl Language {
    /// The two-letter code written to the catalog.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Jp => "JP",
        }
    }

    /// Parse a code or long name, ignoring case and surrounding whitespace.
    pub fn parse(token: &str) -> Option<Language> {
        match token.trim().to_ascii_uppercase().as_str() {
            "EN" | "ENGLISH" => Some(Language::En),
            "JP" | "JA" | "JAPANESE" => Some(Language::Jp),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sorted set of languages; serializes as a JSON array in `EN`, `JP` order.
pub type LanguageSet = BTreeSet<Language>;

/// Build a [`LanguageSet`] from a slice.
pub fn language_set(langs: &[Language]) -> LanguageSet {
    langs.iter().copied().collect()
}

/// Join a language set with the spreadsheet list delimiter (`EN|JP`).
pub fn join_languages(langs: &LanguageSet) -> String {
    langs
        .iter()
        .map(|l| l.code())
        .collect::<Vec<_>>()
        .join(LIST_DELIMITER)
}

/// Split a delimited cell into languages.
///
/// Returns the parsed set and the tokens that were not recognised. Empty
/// tokens are skipped silently.
pub fn split_languages(cell: &str) -> (LanguageSet, Vec<String>) {
    let mut langs = LanguageSet::new();
    let mut unknown = Vec::new();
    for token in cell.split(LIST_DELIMITER).map(str::trim) {
        if token.is_empty() {
            continue;
        }
        match Language::parse(token) {
            Some(lang) => {
                langs.insert(lang);
            }
            None => unknown.push(token.to_string()),
        }
    }
    (langs, unknown)
}
