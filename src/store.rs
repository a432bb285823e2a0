//! Catalog file I/O.
//!
//! Reads the whole catalog into memory and writes it back whole. Writes go to
//! a temporary file in the destination directory which is then renamed over
//! the target, so an interrupted run never leaves a truncated catalog behind.
//! Paths ending in `.gz` are read and written gzip-compressed.

use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

use crate::catalog::{parse_catalog, serialize_catalog, validate};
use crate::error::Result;
use crate::models::Card;

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Read a text file, decompressing `.gz` transparently.
pub fn read_text(path: &Path) -> Result<String> {
    let mut contents = String::new();
    if is_gzip(path) {
        let file = fs::File::open(path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        decoder.read_to_string(&mut contents)?;
    } else {
        contents = fs::read_to_string(path)?;
    }
    Ok(contents)
}

/// Atomically replace `path` with `contents`, compressing for `.gz` paths.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(tmp.as_file_mut(), Compression::default());
        encoder.write_all(contents.as_bytes())?;
        encoder.finish()?;
    } else {
        tmp.write_all(contents.as_bytes())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Load and parse the catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<Vec<Card>> {
    let raw = read_text(path)?;
    let cards = parse_catalog(&raw)?;
    log::info!("Loaded {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

/// Serialize `cards` and atomically write them to `path`.
///
/// Cards that [`load_catalog`] would reject are refused and nothing is
/// written.
pub fn save_catalog(path: &Path, cards: &[Card]) -> Result<()> {
    validate(cards)?;
    let raw = serialize_catalog(cards)?;
    write_text(path, &raw)?;
    log::info!("Saved {} cards to {}", cards.len(), path.display());
    Ok(())
}
