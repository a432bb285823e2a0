//! Maintenance toolkit for a personal trading-card collection catalog.
//!
//! The catalog is a JSON array of cards, each with a map of variations
//! (print forms such as `normal` or `reverse_holo`) carrying what the
//! collector owns and which languages the variation was printed in. Every
//! job here reads the whole catalog, changes it in memory, and writes it back
//! atomically.
//!
//! Structural data (which variations exist, where they were printed) comes
//! from outside sources and may be replaced at any time; ownership data
//! (`count`, `ordered`, owned `languages`) comes only from the collector.
//! [`merge_variations`] is the one place those two are reconciled.
//!
//! # Quick start
//!
//! ```no_run
//! use card_catalog::{store, merge_variations, rules};
//! use std::path::Path;
//!
//! let mut cards = store::load_catalog(Path::new("cards.json")).unwrap();
//! for card in &mut cards {
//!     let proposed = rules::era_variations(&card.era);
//!     card.variations = merge_variations(&card.variations, proposed);
//! }
//! store::save_catalog(Path::new("cards.json"), &cards).unwrap();
//! ```

pub mod batch;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod csv_view;
pub mod error;
pub mod http;
pub mod image;
pub mod jobs;
pub mod merge;
pub mod migrate;
pub mod models;
pub mod provider;
pub mod review;
pub mod rules;
pub mod scrape;
pub mod store;

pub use batch::{BatchRunner, RecordOutcome, RunSummary};
pub use cache::ResponseCache;
pub use catalog::{parse_catalog, serialize_catalog};
pub use error::{CatalogError, Result};
pub use merge::{merge_variations, merge_variations_with_report, MergeReport};
pub use models::{Card, Language, LanguageSet, Variation, VariationKey, Variations};
pub use provider::{MetadataProvider, TcgdexClient};
