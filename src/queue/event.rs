use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::{AppContext, NovelsyncError, Result};
use crate::pipeline::ScrapeOutcome;
use crate::queue::delete_item;

/// A queue-item creation event as delivered by the document store.
///
/// `subject` is the document path; its last segment is the item id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEvent {
    pub subject: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// What the event says should be scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueuePayload {
    Url(String),
    Empty,
    Malformed(String),
}

#[derive(Debug, Default, Deserialize)]
struct EventData {
    value: Option<DocumentValue>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentValue {
    fields: Option<DocumentFields>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentFields {
    url: Option<TypedValue>,
}

#[derive(Debug, Default, Deserialize)]
struct TypedValue {
    #[serde(rename = "stringValue")]
    string_value: Option<serde_json::Value>,
}

impl QueueEvent {
    pub fn new(subject: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            subject: subject.into(),
            data,
        }
    }

    /// Event for an item holding `url`, shaped like the store's trigger payload.
    pub fn for_url(id: &str, url: &str) -> Self {
        Self::new(
            format!("documents/scrapingQueue/{id}"),
            serde_json::json!({
                "value": { "fields": { "url": { "stringValue": url } } }
            }),
        )
    }

    pub fn item_id(&self) -> Result<&str> {
        self.subject
            .rsplit('/')
            .next()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                NovelsyncError::MalformedEvent(format!(
                    "subject {:?} names no queue item",
                    self.subject
                ))
            })
    }

    pub fn payload(&self) -> QueuePayload {
        let data: EventData = match serde_json::from_value(self.data.clone()) {
            Ok(data) => data,
            Err(e) => return QueuePayload::Malformed(e.to_string()),
        };

        let Some(raw) = data
            .value
            .and_then(|v| v.fields)
            .and_then(|f| f.url)
            .and_then(|u| u.string_value)
        else {
            return QueuePayload::Malformed("missing url field".into());
        };

        match raw.as_str() {
            Some(url) if url.trim().is_empty() => QueuePayload::Empty,
            Some(url) => QueuePayload::Url(url.trim().to_string()),
            None => QueuePayload::Malformed(format!("url is not a string: {raw}")),
        }
    }
}

/// How one queue event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Scraped(ScrapeOutcome),
    DiscardedMalformed,
    DiscardedEmpty,
}

/// Handle one creation event: scrape its URL, then delete the item.
///
/// The item is deleted even when the scrape returns a store error; that error
/// is returned afterwards.
pub async fn process_event(ctx: &AppContext, event: &QueueEvent) -> Result<EventOutcome> {
    let id = event.item_id()?;

    let url = match event.payload() {
        QueuePayload::Url(url) => url,
        QueuePayload::Malformed(reason) => {
            warn!(id = %id, reason = %reason, "malformed queue item, discarding");
            delete_item(ctx, id);
            return Ok(EventOutcome::DiscardedMalformed);
        }
        QueuePayload::Empty => {
            warn!(id = %id, "queue item has an empty url, discarding");
            delete_item(ctx, id);
            return Ok(EventOutcome::DiscardedEmpty);
        }
    };

    info!(id = %id, url = %url, "processing queue item");
    let result = ctx.scraper().scrape(&url).await;
    delete_item(ctx, id);

    Ok(EventOutcome::Scraped(result?))
}
