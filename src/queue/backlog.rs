use tracing::{error, info, warn};

use crate::app::{AppContext, Result};
use crate::queue::delete_item;

/// Counts for one backlog drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BacklogSummary {
    pub total: usize,
    pub scraped: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Drain a snapshot of the queue, oldest item first.
///
/// Items enqueued after the snapshot is taken wait for the next drain. Every
/// snapshot item is deleted once handled, whatever the result.
pub async fn drain_backlog(ctx: &AppContext) -> Result<BacklogSummary> {
    let items = ctx.store.list_queue()?;
    let scraper = ctx.scraper();
    let mut summary = BacklogSummary {
        total: items.len(),
        ..Default::default()
    };
    info!(count = items.len(), "draining queue backlog");

    for item in &items {
        match item.target_url() {
            None => {
                warn!(id = %item.id, "queue item has no url, skipping");
                summary.skipped += 1;
            }
            Some(url) => match scraper.scrape(url).await {
                Ok(outcome) if outcome.is_success() => summary.scraped += 1,
                Ok(_) => summary.failed += 1,
                Err(e) => {
                    error!(id = %item.id, url = %url, error = %e, "scrape failed");
                    summary.failed += 1;
                }
            },
        }

        delete_item(ctx, &item.id);
    }

    info!(
        scraped = summary.scraped,
        failed = summary.failed,
        skipped = summary.skipped,
        "backlog drained"
    );
    Ok(summary)
}
