use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://novelfull.net";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Settings for talking to the novel site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site origin used to resolve relative links and cover paths
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Fixed delay before each chapter fetch, in milliseconds (default: 500)
    pub chapter_delay_ms: u64,

    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chapter_delay_ms: 500,
            timeout_secs: 30,
        }
    }
}

impl ScraperConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the pre-fetch chapter delay as a Duration
    pub fn chapter_delay(&self) -> Duration {
        Duration::from_millis(self.chapter_delay_ms)
    }

    /// Config pointed at another origin with no chapter delay.
    pub fn for_origin(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chapter_delay_ms: 0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ScraperConfig::default();
        assert_eq!(config.base_url, "https://novelfull.net");
        assert_eq!(config.chapter_delay_ms, 500);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_durations() {
        let config = ScraperConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.chapter_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_for_origin_disables_delay() {
        let config = ScraperConfig::for_origin("http://127.0.0.1:1234");
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.chapter_delay(), Duration::ZERO);
        assert_eq!(config.timeout_secs, 30);
    }
}
