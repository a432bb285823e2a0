//! Variation hints scraped from card-database pages.
//!
//! Only two sites are understood; pages from anywhere else yield no hints.
//! Detection is plain substring matching on the page text, so hints are
//! suggestions, not facts.

use reqwest::Url;
use scraper::{Html, Selector};

use crate::models::{Card, Variations};
use crate::rules::{era_variations, variation_for_key};

/// Card-database site a URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Serebii,
    PkmnCards,
}

impl Site {
    /// Recognise the site from the URL's host.
    pub fn from_url(url: &str) -> Option<Site> {
        let host = Url::parse(url).ok()?.host_str()?.to_lowercase();
        if host.contains("serebii") {
            Some(Site::Serebii)
        } else if host.contains("pkmncards") {
            Some(Site::PkmnCards)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Site::Serebii => "Serebii",
            Site::PkmnCards => "PkmnCards",
        }
    }
}

fn page_text(doc: &Html) -> String {
    doc.root_element().text().collect::<String>().to_lowercase()
}

/// Rarity cell says holo (but not reverse holo) in a `Rarity | value` row.
fn rarity_says_holo(doc: &Html) -> bool {
    let (Ok(rows), Ok(cells)) = (Selector::parse("table tr"), Selector::parse("td")) else {
        return false;
    };
    doc.select(&rows).any(|row| {
        let tds: Vec<String> = row
            .select(&cells)
            .map(|td| td.text().collect::<String>().trim().to_lowercase())
            .collect();
        tds.len() >= 2
            && tds[0].contains("rarity")
            && tds[1].contains("holo")
            && !tds[1].contains("reverse")
    })
}

/// Variation keys suggested by a page from `site`; `normal` is always present.
pub fn page_variation_keys(site: Site, html: &str) -> Vec<&'static str> {
    let doc = Html::parse_document(html);
    let text = page_text(&doc);
    let mut keys = vec!["normal"];

    let (holo, reverse) = match site {
        Site::Serebii => (
            text.contains("holofoil")
                || text.contains("holo rare")
                || text.contains("holographic")
                || rarity_says_holo(&doc),
            text.contains("reverse") && text.contains("holo"),
        ),
        Site::PkmnCards => (
            text.contains("holofoil") || text.contains("holo rare"),
            text.contains("reverse holofoil") || text.contains("reverse holo"),
        ),
    };
    if holo {
        keys.push("holo");
    }
    if reverse {
        keys.push("reverse_holo");
    }
    keys
}

/// Proposed variations for `card`: era defaults, page hints, and a `holo`
/// variation when the card's name says holo.
pub fn propose_from_page(card: &Card, page: Option<(Site, &str)>) -> Variations {
    let mut proposed = era_variations(&card.era);
    if let Some((site, html)) = page {
        for key in page_variation_keys(site, html) {
            proposed
                .entry(key.to_string())
                .or_insert_with(|| variation_for_key(key));
        }
    }
    if card.name.to_lowercase().contains("holo") {
        proposed
            .entry("holo".to_string())
            .or_insert_with(|| variation_for_key("holo"));
    }
    proposed
}
