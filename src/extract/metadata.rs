use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{element_text, resolve_url, tags::classify_tags};
use crate::domain::novel::{
    NovelMetadata, DEFAULT_AUTHOR, DEFAULT_STATUS, NO_SYNOPSIS, UNKNOWN_GENRE, UNKNOWN_TITLE,
};

/// CSS selectors for the landing page.
struct Selectors {
    /// Title inside the description block (current layout).
    title_primary: Selector,
    /// Bare heading title (older layout).
    title_fallback: Selector,
    cover: Selector,
    author: Selector,
    genres: Selector,
    status: Selector,
    synopsis: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    title_primary: Selector::parse(".desc .title").expect("valid selector"),
    title_fallback: Selector::parse("h3.title").expect("valid selector"),
    cover: Selector::parse(".book img").expect("valid selector"),
    author: Selector::parse(".info div:nth-of-type(1) a").expect("valid selector"),
    genres: Selector::parse(".info div:nth-of-type(2)").expect("valid selector"),
    status: Selector::parse(".info div:nth-of-type(4) a").expect("valid selector"),
    synopsis: Selector::parse(".desc-text").expect("valid selector"),
});

const GENRE_LABEL: &str = "Genre:";

/// Raw fields read off a landing page, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandingPage {
    pub title: Option<String>,
    pub cover_src: Option<String>,
    /// All genre tokens in page order; the first is the primary genre
    pub genres: Vec<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    /// Inner markup of the synopsis block
    pub synopsis: Option<String>,
}

impl LandingPage {
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);

        Self {
            title: title(&doc),
            cover_src: cover_src(&doc),
            genres: genres(&doc),
            author: first_text(&doc, &SELECTORS.author),
            status: first_text(&doc, &SELECTORS.status),
            synopsis: synopsis(&doc),
        }
    }

    /// Apply defaults, resolve the cover against `base_url` and derive tags.
    pub fn into_metadata(self, base_url: &str) -> NovelMetadata {
        let title = self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let synopsis = self.synopsis.unwrap_or_else(|| NO_SYNOPSIS.to_string());
        let cover_url = self
            .cover_src
            .map(|src| resolve_url(base_url, &src))
            .unwrap_or_default();

        let (genre, secondary) = match self.genres.split_first() {
            Some((primary, rest)) => (primary.clone(), rest),
            None => (UNKNOWN_GENRE.to_string(), &[][..]),
        };
        let tags = classify_tags(&title, &synopsis, secondary);

        NovelMetadata {
            title,
            author: self.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            genre,
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            synopsis,
            cover_url,
            tags,
        }
    }
}

/// Parse a landing page straight into a metadata record.
pub fn extract_metadata(html: &str, base_url: &str) -> NovelMetadata {
    LandingPage::parse(html).into_metadata(base_url)
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn title(doc: &Html) -> Option<String> {
    first_text(doc, &SELECTORS.title_primary).or_else(|| first_text(doc, &SELECTORS.title_fallback))
}

fn cover_src(doc: &Html) -> Option<String> {
    doc.select(&SELECTORS.cover)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(String::from)
}

fn genres(doc: &Html) -> Vec<String> {
    let Some(row) = doc.select(&SELECTORS.genres).next() else {
        return Vec::new();
    };

    let text: String = row.text().collect();
    text.replace(GENRE_LABEL, "")
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

fn synopsis(doc: &Html) -> Option<String> {
    doc.select(&SELECTORS.synopsis)
        .next()
        .map(|el| el.inner_html().trim().to_string())
}
