//! HTML extraction for the novel site.
//!
//! Every lookup here is best-effort: a selector that matches nothing yields
//! `None` or an empty list, and callers substitute a named default. Nothing in
//! this module returns an error.

pub mod chapter_title;
pub mod content;
pub mod listing;
pub mod metadata;
pub mod tags;

pub use chapter_title::clean_chapter_title;
pub use content::sanitize_chapter_html;
pub use listing::{chapter_links, listing_page_url, ChapterLink, UNNUMBERED};
pub use metadata::{extract_metadata, LandingPage};
pub use tags::classify_tags;

use scraper::ElementRef;
use url::Url;

/// Make `href` absolute against the site origin.
///
/// Absolute `http(s)` URLs pass through untouched; root-relative and bare
/// relative paths are joined onto `base_url`.
pub fn resolve_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => {
            let base = base_url.trim_end_matches('/');
            if href.starts_with('/') {
                format!("{base}{href}")
            } else {
                format!("{base}/{href}")
            }
        }
    }
}

/// Trimmed text of an element, with inner whitespace runs between nodes
/// collapsed to a single space.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
