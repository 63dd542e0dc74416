//! Configuration management for novelsync.
//!
//! Configuration is read from `~/.config/novelsync/config.toml` at startup
//! (or from the path given with `--config`). If the file doesn't exist, a
//! default configuration with comments is created.

pub mod scraper;

pub use self::scraper::ScraperConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub store: StoreConfig,
}

/// Where the document store lives.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file; defaults to the platform data directory
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/novelsync/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("novelsync").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# novelsync configuration

[scraper]
# Site origin used to resolve relative chapter links and cover images
base_url = "https://novelfull.net"

# User agent sent with every request
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"

# Fixed delay before each chapter fetch (milliseconds)
chapter_delay_ms = 500

# Per-request timeout in seconds
timeout_secs = 30

[store]
# SQLite database file (default: <data dir>/novelsync/novelsync.db)
# path = "/var/lib/novelsync/novelsync.db"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.scraper, ScraperConfig::default());
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[scraper]
chapter_delay_ms = 1500

[store]
path = "/tmp/novels.db"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.scraper.chapter_delay_ms, 1500);
        assert_eq!(config.scraper.base_url, "https://novelfull.net");
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/novels.db")));
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.scraper.timeout_secs, 30);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config.scraper.chapter_delay_ms, 500);

        // Second load parses the file that was just written.
        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.scraper, config.scraper);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scraper\nbase_url = 1").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
