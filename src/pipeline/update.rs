use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use crate::app::Result;
use crate::domain::{slug_from_url, Chapter, Novel};
use crate::extract::{chapter_links, clean_chapter_title, listing_page_url, ChapterLink};
use crate::pipeline::orchestrator::NovelScraper;

/// Totals for one update pass over the stored novels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub novels_checked: usize,
    pub chapters_added: usize,
    pub failures: usize,
}

impl NovelScraper {
    /// Look for chapters published since each novel was scraped.
    ///
    /// A novel that fails is logged and counted; the pass moves on.
    pub async fn update_all(&self) -> Result<UpdateSummary> {
        let novels = self.store.list_novels()?;
        let mut summary = UpdateSummary::default();
        info!(count = novels.len(), "starting update pass");

        for novel in &novels {
            if novel.novel_url.trim().is_empty() {
                warn!(slug = %novel.slug, "novel has no source url, skipping");
                continue;
            }

            summary.novels_checked += 1;
            match self.update_novel(novel).await {
                Ok(added) => summary.chapters_added += added,
                Err(e) => {
                    error!(slug = %novel.slug, error = %e, "update failed");
                    summary.failures += 1;
                }
            }
        }

        info!(
            checked = summary.novels_checked,
            added = summary.chapters_added,
            failures = summary.failures,
            "update pass finished"
        );
        Ok(summary)
    }

    /// Append chapters not yet stored, numbered after the current maximum in
    /// the order given by [`ChapterLink::sort_number`].
    ///
    /// Chapters whose content cannot be fetched are left out so the next
    /// pass retries them.
    pub async fn update_novel(&self, novel: &Novel) -> Result<usize> {
        let links = self.collect_chapter_links(&novel.novel_url).await?;

        let known: HashSet<String> = self
            .store
            .list_chapters(&novel.slug)?
            .into_iter()
            .map(|c| c.slug)
            .collect();
        let mut next_number = self.store.max_chapter_number(&novel.slug)?.unwrap_or(0) + 1;

        let mut pending: Vec<ChapterLink> = links
            .into_iter()
            .filter(|link| !known.contains(&slug_from_url(&link.url)))
            .collect();
        pending.sort_by_key(ChapterLink::sort_number);

        let mut fresh = Vec::new();
        for link in pending {
            match self.chapters.fetch_checked(&link.url).await {
                Ok(Some(content)) if !content.is_empty() => {
                    let title = clean_chapter_title(&link.title);
                    fresh.push(Chapter::new(next_number, title, link.url, content));
                    next_number += 1;
                }
                Ok(_) => debug!(url = %link.url, "no content yet, will retry"),
                Err(e) => warn!(url = %link.url, error = %e, "chapter fetch failed, will retry"),
            }
        }

        if fresh.is_empty() {
            debug!(slug = %novel.slug, "no new chapters");
            return Ok(0);
        }

        self.store.append_chapters(&novel.slug, &fresh)?;
        info!(slug = %novel.slug, count = fresh.len(), "new chapters appended");
        Ok(fresh.len())
    }

    /// Every distinct chapter link across the listing pages, in page order.
    /// A failing first page is an error; later failures end the walk.
    async fn collect_chapter_links(&self, novel_url: &str) -> Result<Vec<ChapterLink>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut links = Vec::new();

        for page in 1u32.. {
            let html = match self.fetcher.fetch(&listing_page_url(novel_url, page)).await {
                Ok(html) => html,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    debug!(page, error = %e, "listing page fetch failed, stopping");
                    break;
                }
            };

            let before = links.len();
            for link in chapter_links(&html, &self.config.base_url) {
                if seen.insert(slug_from_url(&link.url)) {
                    links.push(link);
                }
            }

            if links.len() == before {
                break;
            }
        }

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ScraperConfig;
    use crate::domain::NovelMetadata;
    use crate::domain::NovelRecord;
    use crate::fetcher::testing::StaticFetcher;
    use crate::pipeline::fixtures::*;
    use crate::store::{SqliteStore, Store};

    fn seed(store: &SqliteStore, chapters: &[u32]) -> String {
        let slug = slug_from_url(NOVEL_URL);
        store
            .merge_novel(&NovelRecord::new(&slug, NOVEL_URL, NovelMetadata::default()))
            .unwrap();
        let batch: Vec<Chapter> = chapters
            .iter()
            .map(|n| Chapter::new(*n, format!("Old {n}"), chapter_url(*n), "<p>old</p>".into()))
            .collect();
        store.commit_chapters(&slug, &batch).unwrap();
        slug
    }

    fn listing(numbers: &[u32]) -> String {
        let links: Vec<(String, String)> = numbers
            .iter()
            .map(|n| (chapter_href(*n), format!("C{n}: New {n}")))
            .collect();
        let refs: Vec<(&str, &str)> = links.iter().map(|(h, t)| (h.as_str(), t.as_str())).collect();
        novel_page("The Villain", &refs)
    }

    #[tokio::test]
    async fn test_update_appends_after_highest_number() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let slug = seed(&store, &[1, 2]);
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_page(NOVEL_URL, &listing(&[1, 2, 3, 4, 5]))
                .with_page(&chapter_url(3), &chapter_page("<p>3</p>"))
                .with_page(&chapter_url(4), "<html><body>pending</body></html>")
                .with_page(&chapter_url(5), &chapter_page("<p>5</p>")),
        );
        let scraper = NovelScraper::new(store.clone(), fetcher.clone(), ScraperConfig::for_origin(BASE));

        let summary = scraper.update_all().await.unwrap();

        assert_eq!(
            summary,
            UpdateSummary {
                novels_checked: 1,
                chapters_added: 2,
                failures: 0,
            }
        );
        let chapters = store.list_chapters(&slug).unwrap();
        let numbered: Vec<(u32, &str)> = chapters
            .iter()
            .map(|c| (c.chapter_number, c.title.as_str()))
            .collect();
        assert_eq!(
            numbered,
            vec![(1, "Old 1"), (2, "Old 2"), (3, "New 3"), (4, "New 5")]
        );
        assert!(store.get_novel(&slug).unwrap().unwrap().updated_at.is_some());
        assert!(!fetcher.requests().contains(&chapter_url(1)));
    }

    #[tokio::test]
    async fn test_update_numbers_new_chapters_in_reading_order() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let slug = seed(&store, &[]);
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_page(NOVEL_URL, &listing(&[5, 3, 4]))
                .with_page(&chapter_url(3), &chapter_page("<p>3</p>"))
                .with_page(&chapter_url(4), &chapter_page("<p>4</p>"))
                .with_page(&chapter_url(5), &chapter_page("<p>5</p>")),
        );
        let scraper = NovelScraper::new(store.clone(), fetcher, ScraperConfig::for_origin(BASE));

        scraper.update_all().await.unwrap();

        let chapters = store.list_chapters(&slug).unwrap();
        let numbered: Vec<(u32, &str)> = chapters
            .iter()
            .map(|c| (c.chapter_number, c.title.as_str()))
            .collect();
        assert_eq!(numbered, vec![(1, "New 3"), (2, "New 4"), (3, "New 5")]);
    }

    #[tokio::test]
    async fn test_update_without_new_chapters_leaves_novel_untouched() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let slug = seed(&store, &[1]);
        let fetcher = Arc::new(StaticFetcher::new().with_page(NOVEL_URL, &listing(&[1])));
        let scraper = NovelScraper::new(store.clone(), fetcher, ScraperConfig::for_origin(BASE));

        let summary = scraper.update_all().await.unwrap();

        assert_eq!(summary.chapters_added, 0);
        assert!(store.get_novel(&slug).unwrap().unwrap().updated_at.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_novel_counts_as_failure() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        seed(&store, &[1]);
        let scraper = NovelScraper::new(
            store.clone(),
            Arc::new(StaticFetcher::new()),
            ScraperConfig::for_origin(BASE),
        );

        let summary = scraper.update_all().await.unwrap();

        assert_eq!(summary.novels_checked, 1);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.chapters_added, 0);
    }
}
