use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending scrape request. Read once, then always deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl QueueItem {
    /// The URL to scrape, if present and non-empty.
    pub fn target_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}
