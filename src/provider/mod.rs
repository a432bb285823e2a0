//! External card-metadata providers.
//!
//! A provider is looked up by card name and answers with the print variants
//! it knows for that card. [`MetadataProvider`] is the seam the sync job uses,
//! so it can run against [`tcgdex::TcgdexClient`] or an in-memory fake.

pub mod tcgdex;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use tcgdex::{proposed_variations, TcgdexClient, TcgdexClientBuilder};

// ---------------------------------------------------------------------------
// Provider payloads
// ---------------------------------------------------------------------------

/// Short card entry from a listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBrief {
    pub id: String,
    pub name: String,
    pub local_id: Option<String>,
    pub image: Option<String>,
}

/// Which print variants exist for a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantFlags {
    pub normal: bool,
    #[serde(alias = "reverseHolo")]
    pub reverse: bool,
    pub holo: bool,
    #[serde(alias = "1stEdition")]
    pub first_edition: bool,
}

/// Set a card belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetBrief {
    pub id: String,
    pub name: String,
}

/// Full card record from the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDetail {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variants: VariantFlags,
    #[serde(default)]
    pub set: SetBrief,
}

/// A card-metadata source queried by name.
pub trait MetadataProvider {
    /// Every card credited to `illustrator`.
    fn cards_by_illustrator(&mut self, illustrator: &str) -> Result<Vec<CardBrief>>;

    /// Full record for a provider card id.
    fn card_detail(&mut self, id: &str) -> Result<CardDetail>;
}

// ---------------------------------------------------------------------------
// NameIndex
// ---------------------------------------------------------------------------

/// Result of looking a card up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch<'a> {
    None,
    Unique(&'a str),
    /// Several printings share the name; the first listed one is chosen.
    Ambiguous { chosen: &'a str, candidates: &'a [String] },
}

/// Provider card ids grouped by exact card name, in listing order.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Vec<String>>,
}

impl NameIndex {
    pub fn new(briefs: &[CardBrief]) -> Self {
        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();
        for brief in briefs {
            if brief.name.is_empty() {
                continue;
            }
            by_name
                .entry(brief.name.clone())
                .or_default()
                .push(brief.id.clone());
        }
        Self { by_name }
    }

    pub fn lookup(&self, name: &str) -> NameMatch<'_> {
        match self.by_name.get(name).map(Vec::as_slice) {
            None | Some([]) => NameMatch::None,
            Some([only]) => NameMatch::Unique(only),
            Some(all) => NameMatch::Ambiguous {
                chosen: &all[0],
                candidates: all,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
