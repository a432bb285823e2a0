//! On-disk cache of metadata-provider responses.
//!
//! Each response is stored as a JSON file named after its request key, so a
//! re-run of a long enrichment pass only hits the network for cards it has
//! not seen. In offline mode nothing is fetched and a miss is an error.

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config;
use crate::error::{CatalogError, Result};
use crate::store;

/// JSON response cache rooted at a directory.
pub struct ResponseCache {
    /// Directory where cached responses are stored.
    pub cache_dir: PathBuf,
    /// If true, never fetch (use cached responses only).
    pub offline: bool,
}

impl ResponseCache {
    /// Create a cache, creating the directory if needed.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
        })
    }

    /// File path for a request key; anything outside `[A-Za-z0-9._-]` becomes `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.cache_dir.join(format!("{name}.json"))
    }

    /// Read a cached response.
    ///
    /// A file that fails to parse is deleted and treated as a miss.
    pub fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("Corrupt cache file {}: {} -- removing", path.display(), e);
                let _ = fs::remove_file(&path);
                Ok(None)
            }
        }
    }

    /// Store a response.
    pub fn save(&self, key: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string(value)?;
        store::write_text(&self.path_for(key), &text)
    }

    /// Return the cached response for `key`, calling `fetch` on a miss.
    pub fn get_or_fetch<T, F>(&self, key: &str, fetch: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Result<Value>,
    {
        let value = match self.load(key)? {
            Some(value) => value,
            None if self.offline => {
                return Err(CatalogError::NotFound(format!(
                    "response '{key}' not cached and offline mode is enabled"
                )));
            }
            None => {
                let value = fetch()?;
                self.save(key, &value)?;
                value
            }
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Remove all cached responses and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}
