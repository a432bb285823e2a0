use std::path::PathBuf;
use std::time::Duration;

pub const TCGDEX_BASE: &str = "https://api.tcgdex.net/v2";
pub const TCGDEX_LANGUAGE: &str = "en";
pub const DEFAULT_ILLUSTRATOR: &str = "Yuka Morii";

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) card-catalog";

/// Timeout for a single HTTP request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Pause between two consecutive requests to the same service.
pub const API_DELAY: Duration = Duration::from_millis(150);
pub const SCRAPE_DELAY: Duration = Duration::from_secs(1);
pub const IMAGE_DELAY: Duration = Duration::from_millis(100);

/// Records processed between two checkpoint writes of a long batch.
pub const CHECKPOINT_EVERY: usize = 20;

/// Separator for language lists inside a spreadsheet cell.
pub const LIST_DELIMITER: &str = "|";

/// Marker in the review sheet's notes column that deletes the card.
pub const DELETE_MARKER: &str = "DELETE";

pub const CATALOG_FILE: &str = "cards.json";

/// Default catalog location: `cards.json` in the platform data directory
/// (e.g. `~/.local/share/card-catalog` on Linux), or the working directory
/// when the platform has none.
pub fn default_catalog_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("card-catalog").join(CATALOG_FILE)
    } else {
        PathBuf::from(CATALOG_FILE)
    }
}

/// Default directory for cached API responses.
pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("card-catalog")
    } else {
        PathBuf::from(".card-catalog-cache")
    }
}
