use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{NovelsyncError, Result};
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::pipeline::NovelScraper;
use crate::store::sqlite::SqliteStore;
use crate::store::Store;

/// Process-wide handles, created once at startup and passed by reference to
/// the orchestrator, the queue drivers and the CLI commands.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn Store + Send + Sync>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path.or_else(|| config.store.path.clone()) {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store: Arc<dyn Store + Send + Sync> = Arc::new(SqliteStore::new(&db_path)?);
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::new(&config.scraper)?);

        Ok(Self {
            config,
            store,
            fetcher,
        })
    }

    /// Wire a context from already-built parts, e.g. a fake fetcher in tests.
    pub fn with_parts(
        config: Config,
        store: Arc<dyn Store + Send + Sync>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
        }
    }

    pub fn scraper(&self) -> NovelScraper {
        NovelScraper::new(
            self.store.clone(),
            self.fetcher.clone(),
            self.config.scraper.clone(),
        )
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| NovelsyncError::Other("Could not find data directory".into()))?;
        let novelsync_dir = data_dir.join("novelsync");
        std::fs::create_dir_all(&novelsync_dir)?;
        Ok(novelsync_dir.join("novelsync.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_flag_overrides_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let configured = dir.path().join("configured.db");
        let flagged = dir.path().join("flagged.db");

        let mut config = Config::default();
        config.store.path = Some(configured.clone());

        let ctx = AppContext::new(config, Some(flagged.clone())).unwrap();
        ctx.store.enqueue(Some("https://novelfull.net/a.html")).unwrap();

        assert!(flagged.exists());
        assert!(!configured.exists());
        assert_eq!(ctx.store.list_queue().unwrap().len(), 1);
    }

    #[test]
    fn test_config_path_used_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let configured = dir.path().join("configured.db");

        let mut config = Config::default();
        config.store.path = Some(configured.clone());

        AppContext::new(config, None).unwrap();
        assert!(configured.exists());
    }
}
