use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::{element_text, resolve_url};

static CHAPTER_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".list-chapter li a").expect("valid selector"));

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid digits regex"));

/// Sort position for a link that carries no number at all.
pub const UNNUMBERED: u64 = 99_999;

/// One entry of a novel's chapter index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLink {
    /// Raw display text, before prefix cleanup
    pub title: String,
    /// Absolute chapter URL
    pub url: String,
}

impl ChapterLink {
    /// Reading-order key: the first number in the title, else the last
    /// number in the URL, else [`UNNUMBERED`].
    pub fn sort_number(&self) -> u64 {
        if let Some(n) = DIGITS.find(&self.title).and_then(|m| m.as_str().parse().ok()) {
            return n;
        }
        DIGITS
            .find_iter(&self.url)
            .last()
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(UNNUMBERED)
    }
}

/// URL of listing page `page` (1-based) for a canonical novel URL.
pub fn listing_page_url(novel_url: &str, page: u32) -> String {
    if page <= 1 {
        novel_url.to_string()
    } else {
        format!("{novel_url}?page={page}")
    }
}

/// All chapter links on a listing page, in page order.
///
/// Anchors without an `href` are skipped. Link text falls back to the
/// anchor's `title` attribute when the text itself is blank.
pub fn chapter_links(html: &str, base_url: &str) -> Vec<ChapterLink> {
    let doc = Html::parse_document(html);

    doc.select(&CHAPTER_LINK)
        .filter_map(|a| {
            let href = a.value().attr("href").map(str::trim).filter(|h| !h.is_empty())?;
            let mut title = element_text(a);
            if title.is_empty() {
                title = a.value().attr("title").unwrap_or_default().trim().to_string();
            }
            Some(ChapterLink {
                title,
                url: resolve_url(base_url, href),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://novelfull.net";

    #[test]
    fn test_listing_page_url() {
        let novel = "https://novelfull.net/villain.html";
        assert_eq!(listing_page_url(novel, 1), novel);
        assert_eq!(listing_page_url(novel, 2), "https://novelfull.net/villain.html?page=2");
        assert_eq!(listing_page_url(novel, 0), novel);
    }

    #[test]
    fn test_chapter_links_resolved_in_order() {
        let html = r#"<div id="list-chapter">
          <ul class="list-chapter">
            <li><a href="/villain/chapter-1.html" title="Chapter 1: Start">Chapter 1: Start</a></li>
            <li><a href="https://novelfull.net/villain/chapter-2.html">C2 - Middle</a></li>
            <li><a href="villain/chapter-3.html"> <span>Chapter 3</span> End </a></li>
          </ul>
        </div>"#;

        let links = chapter_links(html, BASE);
        assert_eq!(
            links,
            vec![
                ChapterLink {
                    title: "Chapter 1: Start".into(),
                    url: "https://novelfull.net/villain/chapter-1.html".into(),
                },
                ChapterLink {
                    title: "C2 - Middle".into(),
                    url: "https://novelfull.net/villain/chapter-2.html".into(),
                },
                ChapterLink {
                    title: "Chapter 3 End".into(),
                    url: "https://novelfull.net/villain/chapter-3.html".into(),
                },
            ]
        );
    }

    #[test]
    fn test_links_outside_list_are_ignored() {
        let html = r#"<ul class="nav"><li><a href="/home">Home</a></li></ul>"#;
        assert!(chapter_links(html, BASE).is_empty());
    }

    #[test]
    fn test_anchor_without_href_skipped_and_title_attr_fallback() {
        let html = r#"<ul class="list-chapter">
            <li><a>Broken</a></li>
            <li><a href="/c/9.html" title="Chapter 9: Nine"></a></li>
        </ul>"#;
        let links = chapter_links(html, BASE);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Chapter 9: Nine");
    }

    #[test]
    fn test_sort_number_prefers_title_then_url() {
        let link = |title: &str, url: &str| ChapterLink {
            title: title.into(),
            url: url.into(),
        };

        assert_eq!(link("Chapter 12: Part 3", "https://x/c-99.html").sort_number(), 12);
        assert_eq!(link("Epilogue", "https://x/v2/chapter-41.html").sort_number(), 41);
        assert_eq!(link("Prologue", "https://x/prologue.html").sort_number(), UNNUMBERED);
    }
}
