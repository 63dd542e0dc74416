//! Queue drivers. Both hand each URL to the scrape orchestrator and always
//! delete the queue item afterwards, so an item is processed at most once.

pub mod backlog;
pub mod event;

pub use backlog::{drain_backlog, BacklogSummary};
pub use event::{process_event, EventOutcome, QueueEvent, QueuePayload};

use tracing::{debug, error};

use crate::app::AppContext;

/// Delete a processed item. Failures are logged, never returned.
pub(crate) fn delete_item(ctx: &AppContext, id: &str) -> bool {
    match ctx.store.delete_queue_item(id) {
        Ok(()) => {
            debug!(id = %id, "queue item deleted");
            true
        }
        Err(e) => {
            error!(id = %id, error = %e, "failed to delete queue item, manual intervention required");
            false
        }
    }
}
