//! Catalog document boundary: JSON text in, cards out, and back.
//!
//! Parsing validates each record independently so a failure names the
//! offending record; serialization is deterministic so two catalog versions
//! diff cleanly.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::models::{Card, VariationIssue, VariationKey};

/// Parse a catalog document (a JSON array of card records).
///
/// Fails with [`CatalogError::Schema`] when the text is not JSON, the
/// document is not an array, a record is not an object, `id` or `name` is
/// missing or empty, a field has the wrong type, or two records share an `id`.
pub fn parse_catalog(raw: &str) -> Result<Vec<Card>> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| CatalogError::schema(0, None, format!("invalid JSON: {e}")))?;
    let Value::Array(records) = doc else {
        return Err(CatalogError::schema(0, None, "catalog must be a JSON array of cards"));
    };

    let mut cards = Vec::with_capacity(records.len());
    let mut seen = HashSet::new();

    for (index, record) in records.into_iter().enumerate() {
        let Value::Object(ref fields) = record else {
            return Err(CatalogError::schema(index, None, "record is not an object"));
        };
        let id = match fields.get("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
            Some(Value::String(_)) => {
                return Err(CatalogError::schema(index, None, "field `id` is empty"));
            }
            Some(_) => {
                return Err(CatalogError::schema(index, None, "field `id` is not a string"));
            }
            None => {
                return Err(CatalogError::schema(index, None, "missing required field `id`"));
            }
        };

        let card: Card = serde_json::from_value(record)
            .map_err(|e| CatalogError::schema(index, Some(&id), e.to_string()))?;
        check_record(index, &card, &mut seen)?;
        cards.push(card);
    }

    Ok(cards)
}

fn check_record(index: usize, card: &Card, seen: &mut HashSet<String>) -> Result<()> {
    if card.id.trim().is_empty() {
        return Err(CatalogError::schema(index, None, "field `id` is empty"));
    }
    if card.name.trim().is_empty() {
        return Err(CatalogError::schema(index, Some(&card.id), "field `name` is empty"));
    }
    if !seen.insert(card.id.clone()) {
        return Err(CatalogError::schema(index, Some(&card.id), "duplicate card id"));
    }
    Ok(())
}

/// Check in-memory cards against the record rules [`parse_catalog`] enforces.
pub fn validate(cards: &[Card]) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, card) in cards.iter().enumerate() {
        check_record(index, card, &mut seen)?;
    }
    Ok(())
}

/// Serialize cards as the catalog document.
///
/// Two-space indentation, non-ASCII text written verbatim, fields in model
/// order, variation keys and language lists sorted, trailing newline.
pub fn serialize_catalog(cards: &[Card]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(cards)?;
    out.push('\n');
    Ok(out)
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// A soft-invariant violation located in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFinding {
    pub card_id: String,
    pub card_name: String,
    pub variation: VariationKey,
    pub issue: VariationIssue,
}

/// List every variation that breaks a soft invariant.
pub fn audit(cards: &[Card]) -> Vec<AuditFinding> {
    let mut findings = Vec::new();
    for card in cards {
        for (key, variation) in &card.variations {
            for issue in variation.violations() {
                findings.push(AuditFinding {
                    card_id: card.id.clone(),
                    card_name: card.name.clone(),
                    variation: key.clone(),
                    issue,
                });
            }
        }
    }
    findings
}
