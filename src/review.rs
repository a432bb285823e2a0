//! Manual review sheets.
//!
//! The variation review sheet lists each card's variation keys for a human to
//! correct; importing it proposes a new variation map per card (or deletes
//! the card) and merges it into the catalog. The language report lists
//! variations whose availability looks incomplete.

use std::collections::HashMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::config::DELETE_MARKER;
use crate::error::Result;
use crate::merge::merge_variations_with_report;
use crate::models::{Card, Variations};
use crate::rules::variations_from_key_list;

// ---------------------------------------------------------------------------
// Variation review sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct ReviewRow {
    #[serde(rename = "Card ID")]
    card_id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Set", default)]
    set: String,
    #[serde(rename = "Era", default)]
    era: String,
    #[serde(rename = "Number", default)]
    number: String,
    #[serde(rename = "URL", default)]
    url: String,
    #[serde(rename = "Current Variations", default)]
    current: String,
    #[serde(rename = "Updated Variations", default)]
    updated: String,
    #[serde(rename = "Notes for QA", default)]
    notes: String,
}

/// What the reviewer asked for one card.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewAction {
    Delete,
    Replace(Variations),
}

/// Counts from [`apply_review`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    /// Variations whose existing ownership was carried into the new map.
    pub preserved: usize,
}

/// Write a review sheet with one row per card.
pub fn write_review_sheet<W: Write>(cards: &[Card], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for card in cards {
        let current = if card.variations.is_empty() {
            "NONE".to_string()
        } else {
            card.variations.keys().cloned().collect::<Vec<_>>().join(", ")
        };
        wtr.serialize(ReviewRow {
            card_id: card.id.clone(),
            name: card.name.clone(),
            set: card.set.clone(),
            era: card.era.clone(),
            number: card.number.clone(),
            url: card.url.clone(),
            current,
            ..ReviewRow::default()
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read reviewer decisions keyed by card id.
///
/// Notes containing `DELETE` (any case) delete the card. Otherwise the
/// `Updated Variations` list is used, or `Current Variations` when that is
/// empty.
pub fn read_review_sheet<R: Read>(reader: R) -> Result<HashMap<String, ReviewAction>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut actions = HashMap::new();

    for record in rdr.deserialize::<ReviewRow>() {
        let row = record?;
        let card_id = row.card_id.trim().to_string();
        if card_id.is_empty() {
            continue;
        }
        let action = if row.notes.to_uppercase().contains(DELETE_MARKER) {
            ReviewAction::Delete
        } else {
            let list = if row.updated.trim().is_empty() {
                &row.current
            } else {
                &row.updated
            };
            ReviewAction::Replace(variations_from_key_list(list))
        };
        actions.insert(card_id, action);
    }

    Ok(actions)
}

/// Apply reviewer decisions to the catalog.
///
/// Cards without a decision are kept unchanged; replaced maps go through the
/// merge engine so ownership survives.
pub fn apply_review(
    cards: Vec<Card>,
    actions: &HashMap<String, ReviewAction>,
) -> (Vec<Card>, ReviewSummary) {
    let mut summary = ReviewSummary::default();
    let mut kept = Vec::with_capacity(cards.len());

    for mut card in cards {
        match actions.get(&card.id) {
            None => {
                summary.unchanged += 1;
                kept.push(card);
            }
            Some(ReviewAction::Delete) => {
                log::info!("Deleting {}", card);
                summary.deleted += 1;
            }
            Some(ReviewAction::Replace(proposed)) => {
                let (merged, report) =
                    merge_variations_with_report(&card.variations, proposed.clone());
                if report.lost_ownership() {
                    log::warn!(
                        "{}: review removed owned variations {:?}",
                        card,
                        report.dropped_with_ownership
                    );
                }
                summary.preserved += report.preserved_ownership;
                summary.updated += 1;
                card.variations = merged;
                kept.push(card);
            }
        }
    }

    (kept, summary)
}

// ---------------------------------------------------------------------------
// Language review report
// ---------------------------------------------------------------------------

/// A variation whose availability does not list exactly two languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageReviewItem {
    pub card_id: String,
    pub card_name: String,
    pub set: String,
    pub era: String,
    pub number: String,
    pub variation_type: String,
    pub current_languages: String,
    pub lang_count: usize,
    pub url: String,
}

/// Variations that need a human to confirm their languages.
pub fn language_review(cards: &[Card]) -> Vec<LanguageReviewItem> {
    let mut items = Vec::new();
    for card in cards {
        for (key, variation) in &card.variations {
            let langs = &variation.available_languages;
            if langs.len() == 2 {
                continue;
            }
            let current_languages = if langs.is_empty() {
                "NOT SET".to_string()
            } else {
                langs.iter().map(|l| l.code()).collect::<Vec<_>>().join(", ")
            };
            items.push(LanguageReviewItem {
                card_id: card.id.clone(),
                card_name: card.name.clone(),
                set: card.set.clone(),
                era: card.era.clone(),
                number: card.number.clone(),
                variation_type: key.clone(),
                current_languages,
                lang_count: langs.len(),
                url: card.url.clone(),
            });
        }
    }
    items
}

/// Write the language report as CSV.
pub fn write_language_review<W: Write>(items: &[LanguageReviewItem], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for item in items {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}
