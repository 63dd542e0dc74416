use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::Result;
use crate::extract::sanitize_chapter_html;
use crate::fetcher::{Fetcher, RequestDelay};

/// Stored when a chapter page has no content container.
pub const CONTENT_UNAVAILABLE: &str = "<p>Content not available.</p>";

/// Stored when a chapter page could not be fetched.
pub fn error_placeholder(err: &impl Display) -> String {
    format!(
        "<p>Error loading content: {}</p>",
        html_escape::encode_text(&err.to_string())
    )
}

/// Fetches chapter pages one at a time, pausing before each request.
pub struct ChapterContentFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    delay: RequestDelay,
}

impl ChapterContentFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, delay: RequestDelay) -> Self {
        Self { fetcher, delay }
    }

    /// Sanitized content, `None` when the page has no content container.
    pub async fn fetch_checked(&self, url: &str) -> Result<Option<String>> {
        self.delay.wait().await;
        let html = self.fetcher.fetch(url).await?;
        Ok(sanitize_chapter_html(&html))
    }

    /// Never fails: problems are folded into a placeholder fragment.
    pub async fn fetch(&self, url: &str) -> String {
        match self.fetch_checked(url).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!(url = %url, "no content container");
                CONTENT_UNAVAILABLE.to_string()
            }
            Err(e) => {
                warn!(url = %url, error = %e, "chapter fetch failed");
                error_placeholder(&e)
            }
        }
    }
}
