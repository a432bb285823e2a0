//! Shared fixtures for the card-catalog integration tests.
//!
//! Provides a small sample catalog, variation builders, and in-memory fakes
//! for the metadata provider and the page fetcher so no test touches the
//! network.

#![allow(dead_code)]

use std::collections::HashMap;

use card_catalog::error::{CatalogError, Result};
use card_catalog::http::PageFetcher;
use card_catalog::models::{Card, Language, Variation, Variations};
use card_catalog::provider::{CardBrief, CardDetail, MetadataProvider, SetBrief, VariantFlags};

pub use Language::{En, Jp};

/// Variation with every field spelled out.
pub fn variation(
    count: u32,
    ordered: bool,
    languages: &[Language],
    default: Option<Language>,
    available: &[Language],
) -> Variation {
    Variation {
        count,
        ordered,
        languages: languages.iter().copied().collect(),
        default_language: default,
        available_languages: available.iter().copied().collect(),
        legacy_owned: None,
    }
}

pub fn variations(entries: Vec<(&str, Variation)>) -> Variations {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Catalog document with three cards covering the common shapes.
pub const SAMPLE_CATALOG: &str = r#"[
  {
    "id": "neo-genesis-17",
    "name": "Pikachu",
    "set": "Neo Genesis",
    "era": "Neo",
    "number": "70",
    "url": "https://www.serebii.net/card/neogenesis/070.shtml",
    "imageUrl": "https://www.serebii.net/card/neogenesis/70.jpg",
    "variations": {
      "normal": {
        "count": 2,
        "ordered": false,
        "languages": ["EN"],
        "default_language": "EN",
        "available_languages": ["EN", "JP"]
      },
      "first_edition": {
        "count": 0,
        "ordered": true,
        "languages": [],
        "default_language": "EN",
        "available_languages": ["EN"]
      }
    },
    "enriched": true,
    "enriched_method": "tcgdex"
  },
  {
    "id": "swsh-45",
    "name": "Wormadam",
    "set": "Astral Radiance",
    "era": "Sword & Shield",
    "number": 45,
    "sheet_no": "12",
    "url": "https://pkmncards.com/card/wormadam-astral-radiance-asr-045/",
    "variations": {
      "normal": {
        "count": 1,
        "ordered": false,
        "languages": ["EN", "JP"],
        "default_language": "EN",
        "available_languages": ["EN"]
      },
      "reverse_holo": {
        "count": 0,
        "ordered": false,
        "languages": [],
        "default_language": "EN",
        "available_languages": []
      }
    },
    "enriched": false
  },
  {
    "id": "promo-tokyo",
    "name": "Pikachu TOKYO",
    "set": "Unnumbered Releases",
    "era": "Black and White",
    "number": "",
    "url": "https://example.com/pikachu-tokyo",
    "variations": {}
  }
]"#;

pub fn sample_cards() -> Vec<Card> {
    card_catalog::parse_catalog(SAMPLE_CATALOG).unwrap()
}

pub fn find<'a>(cards: &'a [Card], id: &str) -> &'a Card {
    cards.iter().find(|c| c.id == id).unwrap()
}

// ---------------------------------------------------------------------------
// FakeProvider
// ---------------------------------------------------------------------------

/// In-memory metadata provider.
#[derive(Default)]
pub struct FakeProvider {
    pub briefs: Vec<CardBrief>,
    pub details: HashMap<String, CardDetail>,
    /// Ids whose detail request fails.
    pub failing: Vec<String>,
    pub detail_calls: Vec<String>,
}

impl FakeProvider {
    pub fn with_card(mut self, id: &str, name: &str, set_id: &str, flags: VariantFlags) -> Self {
        self.briefs.push(CardBrief {
            id: id.to_string(),
            name: name.to_string(),
            ..CardBrief::default()
        });
        self.details.insert(
            id.to_string(),
            CardDetail {
                id: id.to_string(),
                name: name.to_string(),
                variants: flags,
                set: SetBrief {
                    id: set_id.to_string(),
                    name: set_id.to_string(),
                },
            },
        );
        self
    }
}

impl MetadataProvider for FakeProvider {
    fn cards_by_illustrator(&mut self, _illustrator: &str) -> Result<Vec<CardBrief>> {
        Ok(self.briefs.clone())
    }

    fn card_detail(&mut self, id: &str) -> Result<CardDetail> {
        self.detail_calls.push(id.to_string());
        if self.failing.iter().any(|f| f == id) {
            return Err(CatalogError::SourceUnavailable(format!("{id}: connection reset")));
        }
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FakeFetcher
// ---------------------------------------------------------------------------

/// Serves canned pages by URL; unknown URLs fail like a dead host.
#[derive(Default)]
pub struct FakeFetcher {
    pub pages: HashMap<String, String>,
    pub requests: Vec<String>,
}

impl FakeFetcher {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

impl PageFetcher for FakeFetcher {
    fn fetch_page(&mut self, url: &str) -> Result<String> {
        self.requests.push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::SourceUnavailable(format!("{url}: 404 Not Found")))
    }
}
