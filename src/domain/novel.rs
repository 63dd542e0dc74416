use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_GENRE: &str = "Unknown";
pub const DEFAULT_AUTHOR: &str = "Unknown";
pub const DEFAULT_STATUS: &str = "Ongoing";
pub const NO_SYNOPSIS: &str = "<p>No synopsis.</p>";

/// Maximum number of tags kept on a novel.
pub const MAX_TAGS: usize = 6;

/// Fields pulled off a novel's landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelMetadata {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: String,
    /// HTML fragment, kept verbatim
    pub synopsis: String,
    pub cover_url: String,
    pub tags: Vec<String>,
}

impl Default for NovelMetadata {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            genre: UNKNOWN_GENRE.to_string(),
            status: DEFAULT_STATUS.to_string(),
            synopsis: NO_SYNOPSIS.to_string(),
            cover_url: String::new(),
            tags: Vec::new(),
        }
    }
}

/// What the scraper writes for a novel. Timestamps are left to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovelRecord {
    pub slug: String,
    pub novel_url: String,
    pub meta: NovelMetadata,
}

impl NovelRecord {
    pub fn new(slug: impl Into<String>, novel_url: impl Into<String>, meta: NovelMetadata) -> Self {
        Self {
            slug: slug.into(),
            novel_url: novel_url.into(),
            meta,
        }
    }
}

/// A novel as read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Novel {
    pub slug: String,
    pub novel_url: String,
    pub meta: NovelMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Novel {
    pub fn display_title(&self) -> &str {
        if self.meta.title.is_empty() {
            &self.novel_url
        } else {
            &self.meta.title
        }
    }
}
