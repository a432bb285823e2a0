//! Catalog maintenance jobs built on the merge engine and the batch runner.

use std::collections::BTreeMap;
use std::path::Path;

use crate::batch::{BatchRunner, RecordOutcome, RunSummary};
use crate::error::Result;
use crate::http::PageFetcher;
use crate::image::locate_image;
use crate::merge::{merge_variations_with_report, MergeReport};
use crate::migrate::ownership_from_status;
use crate::models::{Card, Variation, Variations};
use crate::provider::{proposed_variations, MetadataProvider, NameIndex, NameMatch};
use crate::scrape::{propose_from_page, Site};
use crate::store;

pub const METHOD_TCGDEX: &str = "tcgdex";
pub const METHOD_WEB: &str = "web_scraping";

/// Replace `card`'s variations with `proposed` merged over the existing ones.
pub fn refresh_variations(card: &mut Card, proposed: Variations) -> MergeReport {
    let (merged, report) = merge_variations_with_report(&card.variations, proposed);
    if report.lost_ownership() {
        log::warn!(
            "  {}: dropped variations with ownership {:?}",
            card,
            report.dropped_with_ownership
        );
    }
    card.variations = merged;
    report
}

// ---------------------------------------------------------------------------
// Metadata provider sync
// ---------------------------------------------------------------------------

/// Refresh variation structure from a metadata provider.
///
/// The illustrator's card list is fetched once; failing to get it fails the
/// job. Each card is then matched by exact name (first listed id on
/// ambiguity) and its detail fetched. Cards with no match, or whose match
/// lists no variants at all, are skipped and keep their variations.
pub fn sync_with_provider<P>(
    cards: &mut [Card],
    provider: &mut P,
    illustrator: &str,
    runner: &BatchRunner,
) -> Result<RunSummary>
where
    P: MetadataProvider + ?Sized,
{
    log::info!("Fetching all {} cards from the provider", illustrator);
    let briefs = provider.cards_by_illustrator(illustrator)?;
    log::info!("Found {} provider cards", briefs.len());
    let index = NameIndex::new(&briefs);

    runner.run(cards, |card: &mut Card| {
        let id = match index.lookup(&card.name) {
            NameMatch::None => return Ok(RecordOutcome::Skipped("no match in provider".into())),
            NameMatch::Unique(id) => id,
            NameMatch::Ambiguous { chosen, candidates } => {
                log::warn!(
                    "  {} provider cards named {:?} ({}), using {}",
                    candidates.len(),
                    card.name,
                    candidates.join(", "),
                    chosen
                );
                chosen
            }
        };

        let detail = provider.card_detail(id)?;
        let proposed = proposed_variations(&detail);
        if proposed.is_empty() {
            return Ok(RecordOutcome::Skipped(format!("{id} lists no variants")));
        }
        let report = refresh_variations(card, proposed);
        card.mark_enriched(METHOD_TCGDEX);
        log::info!("  updated from {}: {:?}", id, card.variations.keys().collect::<Vec<_>>());
        log::debug!("  {:?}", report);
        Ok(RecordOutcome::Updated)
    })
}

// ---------------------------------------------------------------------------
// Web enrichment
// ---------------------------------------------------------------------------

/// Give a card without a `normal` variation one that carries the card-level
/// legacy `owned` flag, so the merge keeps that ownership.
fn seed_legacy_ownership(card: &mut Card) {
    let Some(status) = card.owned.as_deref() else {
        return;
    };
    if card.variations.contains_key("normal") {
        return;
    }
    let (count, ordered) = ownership_from_status(status);
    if count == 0 && !ordered {
        return;
    }
    card.variations.insert(
        "normal".to_string(),
        Variation {
            count,
            ordered,
            ..Variation::default()
        },
    );
}

/// Propose variations from era defaults and scraped page hints.
///
/// A page that cannot be fetched only loses its hints; the era defaults
/// still apply.
pub fn enrich_from_web<F>(cards: &mut [Card], fetcher: &mut F, runner: &BatchRunner) -> Result<RunSummary>
where
    F: PageFetcher + ?Sized,
{
    runner.run(cards, |card: &mut Card| {
        let page = match Site::from_url(&card.url) {
            Some(site) => match fetcher.fetch_page(&card.url) {
                Ok(html) => {
                    log::info!("  scraped from {}", site.label());
                    Some((site, html))
                }
                Err(e) => {
                    log::warn!("  error scraping {}: {}", site.label(), e);
                    None
                }
            },
            None => None,
        };

        let proposed = propose_from_page(card, page.as_ref().map(|(site, html)| (*site, html.as_str())));
        seed_legacy_ownership(card);
        refresh_variations(card, proposed);
        card.mark_enriched(METHOD_WEB);
        Ok(RecordOutcome::Updated)
    })
}

// ---------------------------------------------------------------------------
// Image URLs
// ---------------------------------------------------------------------------

/// Fill `imageUrl` for cards that lack one from their source page.
pub fn fill_images<F>(cards: &mut [Card], fetcher: &mut F, runner: &BatchRunner) -> Result<RunSummary>
where
    F: PageFetcher + ?Sized,
{
    runner.run(cards, |card: &mut Card| {
        if card.image_url.is_some() {
            return Ok(RecordOutcome::Unchanged);
        }
        if card.url.is_empty() {
            return Ok(RecordOutcome::Skipped("no source url".into()));
        }
        match locate_image(fetcher, &card.url)? {
            Some(url) => {
                log::info!("  found {}", url);
                card.image_url = Some(url);
                Ok(RecordOutcome::Updated)
            }
            None => Ok(RecordOutcome::Skipped("no image found".into())),
        }
    })
}

// ---------------------------------------------------------------------------
// Manual overrides
// ---------------------------------------------------------------------------

/// Hand-written variation maps keyed by card name.
pub type Overrides = BTreeMap<String, Variations>;

/// Read an overrides document (`{"Card name": {"normal": {...}}}`).
pub fn load_overrides(path: &Path) -> Result<Overrides> {
    let raw = store::read_text(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Apply overrides to every card whose name has one; returns cards changed.
pub fn apply_overrides(cards: &mut [Card], overrides: &Overrides) -> usize {
    let mut fixed = 0;
    for card in cards.iter_mut() {
        if let Some(proposed) = overrides.get(&card.name) {
            refresh_variations(card, proposed.clone());
            log::info!("Fixed: {}", card.name);
            fixed += 1;
        }
    }
    fixed
}
