use serde::{Deserialize, Serialize};

use crate::domain::slug::slug_from_url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Key within the parent novel, derived from `url`
    pub slug: String,
    /// 1-based position assigned in discovery order
    pub chapter_number: u32,
    pub title: String,
    pub url: String,
    /// Sanitized HTML fragment
    pub content: String,
}

impl Chapter {
    pub fn new(chapter_number: u32, title: String, url: String, content: String) -> Self {
        Self {
            slug: slug_from_url(&url),
            chapter_number,
            title,
            url,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_derived_from_url() {
        let chapter = Chapter::new(
            1,
            "The Awakening".into(),
            "https://novelfull.net/novel/chapter-1.html".into(),
            "<p>text</p>".into(),
        );
        assert_eq!(chapter.slug, "https---novelfull-net-novel-chapter-1-html");
        assert_eq!(chapter.chapter_number, 1);
    }
}
