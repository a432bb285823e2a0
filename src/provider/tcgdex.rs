//! TCGdex REST client (`https://api.tcgdex.net/v2`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::{CardBrief, CardDetail, MetadataProvider};
use crate::cache::ResponseCache;
use crate::config;
use crate::error::Result;
use crate::http::Http;
use crate::models::{Language, Variation, Variations};

// ---------------------------------------------------------------------------
// TcgdexClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`TcgdexClient`].
pub struct TcgdexClientBuilder {
    base_url: String,
    language: String,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    delay: Duration,
}

impl Default for TcgdexClientBuilder {
    fn default() -> Self {
        Self {
            base_url: config::TCGDEX_BASE.to_string(),
            language: config::TCGDEX_LANGUAGE.to_string(),
            cache_dir: None,
            offline: false,
            timeout: config::REQUEST_TIMEOUT,
            delay: config::API_DELAY,
        }
    }
}

impl TcgdexClientBuilder {
    /// Override the API root (no trailing slash).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// API language segment; defaults to `en`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set a custom response cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// When offline, only previously cached responses are used.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout. Defaults to 15 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Minimum pause between two requests. Defaults to 150 ms.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn build(self) -> Result<TcgdexClient> {
        let cache = ResponseCache::new(self.cache_dir, self.offline)?;
        Ok(TcgdexClient {
            base_url: self.base_url,
            language: self.language,
            http: Http::new(self.timeout, self.delay),
            cache,
        })
    }
}

// ---------------------------------------------------------------------------
// TcgdexClient
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IllustratorResponse {
    #[serde(default)]
    cards: Vec<CardBrief>,
}

/// Cached, rate-limited TCGdex client.
pub struct TcgdexClient {
    base_url: String,
    language: String,
    http: Http,
    cache: ResponseCache,
}

impl TcgdexClient {
    pub fn builder() -> TcgdexClientBuilder {
        TcgdexClientBuilder::default()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.language, path)
    }

    /// The response cache, e.g. to clear it.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

impl MetadataProvider for TcgdexClient {
    fn cards_by_illustrator(&mut self, illustrator: &str) -> Result<Vec<CardBrief>> {
        let url = self.url(&format!("illustrators/{illustrator}"));
        let key = format!("{}-illustrator-{}", self.language, illustrator);
        let http = &mut self.http;
        let resp: IllustratorResponse = self.cache.get_or_fetch(&key, || http.get_json(&url))?;
        Ok(resp.cards)
    }

    fn card_detail(&mut self, id: &str) -> Result<CardDetail> {
        let url = self.url(&format!("cards/{id}"));
        let key = format!("{}-card-{}", self.language, id);
        let http = &mut self.http;
        self.cache.get_or_fetch(&key, || http.get_json(&url))
    }
}

// ---------------------------------------------------------------------------
// Variant derivation
// ---------------------------------------------------------------------------

/// Structural variations implied by a TCGdex card record.
///
/// VS-series sets were printed in Japanese only. Neo and VS sets have no
/// reverse holo even when the API lists one.
pub fn proposed_variations(detail: &CardDetail) -> Variations {
    use Language::{En, Jp};

    let set_id = detail.set.id.to_lowercase();
    let set_name = detail.set.name.to_lowercase();
    let is_vs = set_id.contains("vs") || set_name.contains("vs");
    let is_neo = set_id.starts_with("neo");
    let flags = &detail.variants;

    let mut proposed = Variations::new();
    if flags.normal {
        let v = if is_vs {
            Variation::structural(Jp, &[Jp])
        } else {
            Variation::structural(En, &[En, Jp])
        };
        proposed.insert("normal".to_string(), v);
    }
    if flags.reverse && !is_neo && !is_vs {
        proposed.insert("reverse_holo".to_string(), Variation::structural(En, &[En, Jp]));
    }
    if flags.first_edition {
        let v = if is_vs {
            Variation::structural(Jp, &[Jp])
        } else {
            Variation::structural(En, &[En])
        };
        proposed.insert("first_edition".to_string(), v);
    }
    if flags.holo {
        proposed.insert("holo".to_string(), Variation::structural(En, &[En, Jp]));
    }
    proposed
}
