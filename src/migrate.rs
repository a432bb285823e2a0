//! Upgrade variations from the `owned: "yes" | "ordered" | "no"` schema.

use crate::models::Card;

/// `(count, ordered)` for a legacy ownership status.
pub fn ownership_from_status(status: &str) -> (u32, bool) {
    match status.trim().to_ascii_lowercase().as_str() {
        "yes" => (1, false),
        "ordered" => (0, true),
        _ => (0, false),
    }
}

/// Counts from a migration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub cards_touched: usize,
    pub variations_migrated: usize,
}

/// Convert every variation still carrying the legacy `owned` status.
///
/// `yes` becomes one owned copy, `ordered` becomes an open order, anything
/// else the empty ownership state. Owned languages stay as they are.
/// Variations already on the current schema are not touched, so running the
/// migration twice changes nothing the second time.
pub fn migrate_catalog(cards: &mut [Card]) -> MigrationReport {
    let mut report = MigrationReport::default();

    for card in cards.iter_mut() {
        let mut touched = false;
        for (key, variation) in card.variations.iter_mut() {
            let Some(status) = variation.legacy_owned.take() else {
                continue;
            };
            let (count, ordered) = ownership_from_status(&status);
            variation.count = count;
            variation.ordered = ordered;
            log::info!(
                "{} - {}: owned=\"{}\" -> count={}, ordered={}",
                card.id,
                key,
                status,
                count,
                ordered
            );
            report.variations_migrated += 1;
            touched = true;
        }
        if touched {
            report.cards_touched += 1;
        }
    }

    report
}
