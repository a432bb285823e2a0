use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::de;
use super::language::{Language, LanguageSet};

/// Name of a variation type within a card (`"normal"`, `"reverse_holo"`, ...).
pub type VariationKey = String;

/// Variations of one card keyed by variation type, in key order.
pub type Variations = BTreeMap<VariationKey, Variation>;

// ---------------------------------------------------------------------------
// Variation — One printable form of a card
// ---------------------------------------------------------------------------

/// One physically distinct printing of a card.
///
/// Fields split into two classes:
///
/// * ownership (`count`, `ordered`, `languages`) is entered by the collector
///   and carried across every automated refresh;
/// * structural (`default_language`, `available_languages`) describes the
///   print run and is replaced by whichever source proposes it.
///
/// Missing or `null` ownership fields read as the empty ownership state so
/// records from older catalog versions load without error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(default, deserialize_with = "de::null_default")]
    pub count: u32,
    #[serde(default, deserialize_with = "de::null_default")]
    pub ordered: bool,
    #[serde(default, deserialize_with = "de::null_default")]
    pub languages: LanguageSet,
    #[serde(
        default,
        deserialize_with = "de::opt_language",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_language: Option<Language>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub available_languages: LanguageSet,
    /// Pre-migration ownership status (`"yes"`, `"ordered"`, `"no"`).
    #[serde(
        default,
        rename = "owned",
        deserialize_with = "de::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_owned: Option<String>,
}

/// A soft invariant a variation does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariationIssue {
    /// `default_language` is set but not among `available_languages`.
    DefaultNotAvailable(Language),
    /// An owned language is not among `available_languages`.
    OwnedNotAvailable(Language),
    /// Still carries the legacy `owned` status.
    LegacyOwnership,
}

impl Variation {
    /// A variation with no ownership, printed in `available`, shown in `default`.
    pub fn structural(default: Language, available: &[Language]) -> Self {
        Self {
            default_language: Some(default),
            available_languages: available.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// True when any ownership field differs from the empty state.
    ///
    /// An unmigrated legacy status counts as ownership data.
    pub fn has_ownership(&self) -> bool {
        self.count > 0 || self.ordered || !self.languages.is_empty() || self.legacy_owned.is_some()
    }

    /// Replace this variation's ownership fields with those of `other`,
    /// including a legacy status still waiting for migration.
    pub fn adopt_ownership(&mut self, other: &Variation) {
        self.count = other.count;
        self.ordered = other.ordered;
        self.languages = other.languages.clone();
        self.legacy_owned = other.legacy_owned.clone();
    }

    /// Replace the availability set, keeping `default_language` inside it.
    ///
    /// A default outside the new set is moved to the set's first language;
    /// an empty set leaves the default alone.
    pub fn set_available(&mut self, available: LanguageSet) {
        if let Some(first) = available.iter().next().copied() {
            match self.default_language {
                Some(lang) if available.contains(&lang) => {}
                _ => self.default_language = Some(first),
            }
        }
        self.available_languages = available;
    }

    /// Check the soft invariants.
    ///
    /// Both language checks only apply when `available_languages` is
    /// non-empty; an unset availability carries no information.
    pub fn violations(&self) -> Vec<VariationIssue> {
        let mut issues = Vec::new();
        if !self.available_languages.is_empty() {
            if let Some(lang) = self.default_language {
                if !self.available_languages.contains(&lang) {
                    issues.push(VariationIssue::DefaultNotAvailable(lang));
                }
            }
            for lang in &self.languages {
                if !self.available_languages.contains(lang) {
                    issues.push(VariationIssue::OwnedNotAvailable(*lang));
                }
            }
        }
        if self.legacy_owned.is_some() {
            issues.push(VariationIssue::LegacyOwnership);
        }
        issues
    }
}
