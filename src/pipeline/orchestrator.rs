use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::Result;
use crate::config::ScraperConfig;
use crate::domain::{canonical_novel_url, slug_from_url, Chapter, NovelRecord};
use crate::extract::{chapter_links, clean_chapter_title, extract_metadata, listing_page_url};
use crate::fetcher::{Fetcher, RequestDelay};
use crate::pipeline::content::ChapterContentFetcher;
use crate::store::Store;

/// How a scrape request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// The novel was already stored; nothing was fetched or written.
    AlreadyExists { slug: String, title: String },
    /// Metadata saved and every discovered chapter committed.
    Completed {
        slug: String,
        title: String,
        chapters: u32,
    },
    /// The landing page could not be fetched; nothing was written.
    LandingPageFailed { url: String, error: String },
}

impl ScrapeOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ScrapeOutcome::LandingPageFailed { .. })
    }
}

pub struct NovelScraper {
    pub(crate) store: Arc<dyn Store + Send + Sync>,
    pub(crate) fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub(crate) config: ScraperConfig,
    pub(crate) chapters: ChapterContentFetcher,
}

impl NovelScraper {
    pub fn new(
        store: Arc<dyn Store + Send + Sync>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        config: ScraperConfig,
    ) -> Self {
        let chapters =
            ChapterContentFetcher::new(fetcher.clone(), RequestDelay::new(config.chapter_delay()));
        Self {
            store,
            fetcher,
            config,
            chapters,
        }
    }

    /// Scrape one novel end to end.
    ///
    /// A novel whose slug is already stored is left untouched. Store errors
    /// propagate; chapters committed before the failure stay committed.
    pub async fn scrape(&self, url: &str) -> Result<ScrapeOutcome> {
        let novel_url = canonical_novel_url(url.trim()).to_string();
        let slug = slug_from_url(&novel_url);
        info!(url = %novel_url, slug = %slug, "starting scrape");

        if let Some(existing) = self.store.get_novel(&slug)? {
            info!(slug = %slug, "novel already stored, skipping");
            return Ok(ScrapeOutcome::AlreadyExists {
                slug,
                title: existing.meta.title,
            });
        }

        let landing = match self.fetcher.fetch(&novel_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %novel_url, error = %e, "landing page fetch failed");
                return Ok(ScrapeOutcome::LandingPageFailed {
                    url: novel_url,
                    error: e.to_string(),
                });
            }
        };

        let meta = extract_metadata(&landing, &self.config.base_url);
        let title = meta.title.clone();
        self.store
            .merge_novel(&NovelRecord::new(&slug, &novel_url, meta))?;
        info!(slug = %slug, title = %title, "metadata saved");

        let chapters = self.scrape_chapters(&slug, &novel_url).await?;
        info!(slug = %slug, chapters, "scrape completed");

        Ok(ScrapeOutcome::Completed {
            slug,
            title,
            chapters,
        })
    }

    /// Walk listing pages until one fails, is empty, or adds nothing new.
    /// Each page's chapters are committed as one batch.
    async fn scrape_chapters(&self, novel_slug: &str, novel_url: &str) -> Result<u32> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut next_number: u32 = 1;

        for page in 1u32.. {
            let page_url = listing_page_url(novel_url, page);
            let html = match self.fetcher.fetch(&page_url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(page, error = %e, "listing page fetch failed, stopping");
                    break;
                }
            };

            let links = chapter_links(&html, &self.config.base_url);
            if links.is_empty() {
                debug!(page, "no chapter links, stopping");
                break;
            }

            let mut batch = Vec::new();
            for link in links {
                if !seen.insert(slug_from_url(&link.url)) {
                    continue;
                }

                let title = clean_chapter_title(&link.title);
                let content = self.chapters.fetch(&link.url).await;
                batch.push(Chapter::new(next_number, title, link.url, content));
                next_number += 1;
            }

            if batch.is_empty() {
                debug!(page, "page repeats known chapters, stopping");
                break;
            }

            self.store.commit_chapters(novel_slug, &batch)?;
            info!(page, count = batch.len(), "chapter batch committed");
        }

        Ok(next_number - 1)
    }
}
