use serde::{Deserialize, Serialize};
use std::fmt;

use super::de;
use super::variation::Variations;

// ---------------------------------------------------------------------------
// Card — One catalog entry
// ---------------------------------------------------------------------------

/// One collectible, identified by `id`, with its variations.
///
/// Field order here is the order written to the catalog file. Keys the model
/// does not know about are kept in `extra` and written after the known ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "de::text")]
    pub set: String,
    #[serde(default, deserialize_with = "de::text")]
    pub era: String,
    #[serde(default, deserialize_with = "de::text")]
    pub number: String,
    #[serde(
        default,
        deserialize_with = "de::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sheet_no: Option<String>,
    /// Card-level ownership flag from before variations existed.
    #[serde(
        default,
        deserialize_with = "de::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub owned: Option<String>,
    #[serde(
        default,
        rename = "imageUrl",
        deserialize_with = "de::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub url: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub variations: Variations,
    #[serde(default, deserialize_with = "de::null_default")]
    pub enriched: bool,
    #[serde(
        default,
        deserialize_with = "de::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub enriched_method: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    /// A card with only its identity set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Record that an automated source populated this card.
    pub fn mark_enriched(&mut self, method: &str) {
        self.enriched = true;
        self.enriched_method = Some(method.to_string());
    }

    /// Total copies owned across all variations.
    pub fn owned_count(&self) -> u32 {
        self.variations.values().map(|v| v.count).sum()
    }
}

/// `Name (Set #number) [id]`, used to locate a record in log output.
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.set.is_empty() || !self.number.is_empty() {
            write!(f, " ({} #{})", self.set, self.number)?;
        }
        write!(f, " [{}]", self.id)
    }
}
