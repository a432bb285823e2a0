//! Locate a card image on the card's source page.

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::http::PageFetcher;

fn first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).next()
}

fn resolve(page: &Url, src: &str) -> Option<String> {
    page.join(src).ok().map(String::from)
}

/// Find the card image in `html`, resolving relative paths against `page_url`.
///
/// Tried in order:
/// 1. `<img width="265">`, the size card-database pages use for the scan;
/// 2. the first `<img>` inside `<table cellpadding="5">`;
/// 3. the `og:image` meta tag;
/// 4. any `<img>` whose `src` contains `/card/`.
pub fn find_image_url(page_url: &str, html: &str) -> Option<String> {
    let page = Url::parse(page_url).ok()?;
    let doc = Html::parse_document(html);

    if let Some(src) = first(&doc, r#"img[width="265"]"#).and_then(|img| img.value().attr("src")) {
        if !src.is_empty() {
            return resolve(&page, src);
        }
    }

    if let Some(src) =
        first(&doc, r#"table[cellpadding="5"] img"#).and_then(|img| img.value().attr("src"))
    {
        if !src.is_empty() {
            return resolve(&page, src);
        }
    }

    if let Some(content) =
        first(&doc, r#"meta[property="og:image"]"#).and_then(|m| m.value().attr("content"))
    {
        if !content.is_empty() {
            return Some(content.to_string());
        }
    }

    let images = Selector::parse("img").ok()?;
    doc.select(&images)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.contains("/card/"))
        .and_then(|src| resolve(&page, src))
}

/// Fetch `page_url` and look for its card image.
pub fn locate_image<F: PageFetcher + ?Sized>(fetcher: &mut F, page_url: &str) -> Result<Option<String>> {
    let html = fetcher.fetch_page(page_url)?;
    Ok(find_image_url(page_url, &html))
}
