//! Flat spreadsheet view of the catalog: one row per (card, variation).
//!
//! Language sets are joined with `|`. A card without variations becomes a
//! single row with an empty `variation_type` so it survives the round trip.
//! The last column, `owned_status`, holds a variation's unmigrated legacy
//! `owned` status; sheets written before it existed still import.
//! Reading groups rows back into cards by `card_id`, in first-seen order.
//! Cells that fail to parse fall back to a default and are reported as
//! [`MalformedField`]s; they never abort the import. Keys in `Card::extra`
//! have no column and are not carried through the sheet.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::models::{join_languages, split_languages, Card, Language, Variation};
use crate::store;

/// Tokens read as `true` in boolean cells (case-insensitive).
pub const TRUTHY: &[&str] = &["true", "1", "yes"];
const FALSY: &[&str] = &["", "false", "0", "no"];

#[derive(Debug, Default, Serialize, Deserialize)]
struct SheetRow {
    card_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    set: String,
    #[serde(default)]
    era: String,
    #[serde(default)]
    number: String,
    #[serde(default)]
    sheet_no: String,
    #[serde(default)]
    owned: String,
    #[serde(default, rename = "imageUrl")]
    image_url: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    enriched: String,
    #[serde(default)]
    enriched_method: String,
    #[serde(default)]
    variation_type: String,
    #[serde(default)]
    count: String,
    #[serde(default)]
    ordered: String,
    #[serde(default)]
    languages: String,
    #[serde(default)]
    default_language: String,
    #[serde(default)]
    available_languages: String,
    #[serde(default)]
    owned_status: String,
}

/// A cell that did not parse and the value used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedField {
    /// 1-based data row (the header is row 0).
    pub row: usize,
    pub card_id: String,
    pub column: &'static str,
    pub value: String,
    pub substituted: String,
}

/// Cards rebuilt from a sheet, plus every cell that needed a fallback.
#[derive(Debug, Clone, Default)]
pub struct SheetImport {
    pub cards: Vec<Card>,
    pub malformed: Vec<MalformedField>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn card_row(card: &Card) -> SheetRow {
    SheetRow {
        card_id: card.id.clone(),
        name: card.name.clone(),
        set: card.set.clone(),
        era: card.era.clone(),
        number: card.number.clone(),
        sheet_no: card.sheet_no.clone().unwrap_or_default(),
        owned: card.owned.clone().unwrap_or_default(),
        image_url: card.image_url.clone().unwrap_or_default(),
        url: card.url.clone(),
        enriched: card.enriched.to_string(),
        enriched_method: card.enriched_method.clone().unwrap_or_default(),
        ..SheetRow::default()
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write the sheet for `cards` to `writer`; returns the number of data rows.
pub fn write_sheet<W: Write>(cards: &[Card], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for card in cards {
        if card.variations.is_empty() {
            wtr.serialize(card_row(card))?;
            rows += 1;
            continue;
        }
        for (key, variation) in &card.variations {
            let mut row = card_row(card);
            row.variation_type = key.clone();
            row.count = variation.count.to_string();
            row.ordered = variation.ordered.to_string();
            row.languages = join_languages(&variation.languages);
            row.default_language = variation
                .default_language
                .map(|l| l.code().to_string())
                .unwrap_or_default();
            row.available_languages = join_languages(&variation.available_languages);
            row.owned_status = variation.legacy_owned.clone().unwrap_or_default();
            wtr.serialize(row)?;
            rows += 1;
        }
    }

    wtr.flush()?;
    Ok(rows)
}

/// Write the sheet for `cards` to `path`, replacing it atomically.
pub fn write_sheet_file(path: &Path, cards: &[Card]) -> Result<usize> {
    let mut buf = Vec::new();
    let rows = write_sheet(cards, &mut buf)?;
    let text = String::from_utf8(buf)
        .map_err(|e| CatalogError::InvalidArgument(format!("sheet is not UTF-8: {e}")))?;
    store::write_text(path, &text)?;
    log::info!(
        "Converted {} cards ({} rows) to {}",
        cards.len(),
        rows,
        path.display()
    );
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

struct CellParser<'a> {
    row: usize,
    card_id: &'a str,
    malformed: &'a mut Vec<MalformedField>,
}

impl CellParser<'_> {
    fn report(&mut self, column: &'static str, value: &str, substituted: &str) {
        log::warn!(
            "Row {} ({}): malformed {} {:?}, using {:?}",
            self.row,
            self.card_id,
            column,
            value,
            substituted
        );
        self.malformed.push(MalformedField {
            row: self.row,
            card_id: self.card_id.to_string(),
            column,
            value: value.to_string(),
            substituted: substituted.to_string(),
        });
    }

    fn count(&mut self, cell: &str) -> u32 {
        let cell = cell.trim();
        if cell.is_empty() {
            return 0;
        }
        match cell.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                self.report("count", cell, "0");
                0
            }
        }
    }

    fn flag(&mut self, column: &'static str, cell: &str) -> bool {
        let token = cell.trim().to_ascii_lowercase();
        if TRUTHY.contains(&token.as_str()) {
            true
        } else {
            if !FALSY.contains(&token.as_str()) {
                self.report(column, cell, "false");
            }
            false
        }
    }

    fn languages(&mut self, column: &'static str, cell: &str) -> crate::models::LanguageSet {
        let (langs, unknown) = split_languages(cell);
        if !unknown.is_empty() {
            self.report(column, cell, &join_languages(&langs));
        }
        langs
    }

    fn language(&mut self, cell: &str) -> Option<Language> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        let lang = Language::parse(cell);
        if lang.is_none() {
            self.report("default_language", cell, "");
        }
        lang
    }
}

/// Rebuild cards from a sheet read from `reader`.
///
/// Card-level columns are taken from the first row of each card; later rows
/// only contribute variations. A repeated `variation_type` overwrites the
/// earlier row. Rows without a `card_id`, and rows that would start a card
/// with an empty `name`, are skipped and reported.
pub fn read_sheet<R: Read>(reader: R) -> Result<SheetImport> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut import = SheetImport::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (i, record) in rdr.deserialize::<SheetRow>().enumerate() {
        let row = record?;
        let row_no = i + 1;
        let card_id = row.card_id.trim().to_string();
        let mut cells = CellParser {
            row: row_no,
            card_id: &card_id,
            malformed: &mut import.malformed,
        };

        if card_id.is_empty() {
            cells.report("card_id", "", "row skipped");
            continue;
        }

        let enriched = cells.flag("enriched", &row.enriched);
        let slot = match index.entry(card_id.clone()) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(_) if row.name.trim().is_empty() => {
                cells.report("name", &row.name, "row skipped");
                continue;
            }
            Entry::Vacant(e) => {
                let mut card = Card::new(card_id.clone(), row.name.clone());
                card.set = row.set.clone();
                card.era = row.era.clone();
                card.number = row.number.clone();
                card.sheet_no = non_empty(&row.sheet_no);
                card.owned = non_empty(&row.owned);
                card.image_url = non_empty(&row.image_url);
                card.url = row.url.clone();
                card.enriched = enriched;
                card.enriched_method = non_empty(&row.enriched_method);
                import.cards.push(card);
                *e.insert(import.cards.len() - 1)
            }
        };

        let key = row.variation_type.trim();
        if key.is_empty() {
            continue;
        }

        let variation = Variation {
            count: cells.count(&row.count),
            ordered: cells.flag("ordered", &row.ordered),
            languages: cells.languages("languages", &row.languages),
            default_language: cells.language(&row.default_language),
            available_languages: cells.languages("available_languages", &row.available_languages),
            legacy_owned: non_empty(&row.owned_status),
        };

        let card = &mut import.cards[slot];
        if card.variations.insert(key.to_string(), variation).is_some() {
            log::warn!("Row {}: {} repeats variation {}, keeping the later row", row_no, card_id, key);
        }
    }

    Ok(import)
}

/// Read a sheet from `path`.
pub fn read_sheet_file(path: &Path) -> Result<SheetImport> {
    let text = store::read_text(path)?;
    let import = read_sheet(text.as_bytes())?;
    log::info!(
        "Read {} cards from {} ({} malformed cells)",
        import.cards.len(),
        path.display(),
        import.malformed.len()
    );
    Ok(import)
}
