pub mod sqlite;

use crate::app::Result;
use crate::domain::{Chapter, Novel, NovelRecord, QueueItem};

pub use sqlite::SqliteStore;

/// Document-store contract: a `novels` collection with a `chapters`
/// subcollection per novel, and the `scrapingQueue` collection.
pub trait Store {
    // Novel operations
    fn get_novel(&self, slug: &str) -> Result<Option<Novel>>;
    /// Insert, or overwrite only the metadata fields of an existing novel.
    /// The creation timestamp is assigned by the store on first insert.
    fn merge_novel(&self, record: &NovelRecord) -> Result<()>;
    fn list_novels(&self) -> Result<Vec<Novel>>;

    // Chapter operations
    /// Write a page worth of chapters as one atomic batch.
    fn commit_chapters(&self, novel_slug: &str, chapters: &[Chapter]) -> Result<()>;
    /// Like `commit_chapters`, and bumps the novel's update timestamp in the
    /// same batch.
    fn append_chapters(&self, novel_slug: &str, chapters: &[Chapter]) -> Result<()>;
    fn list_chapters(&self, novel_slug: &str) -> Result<Vec<Chapter>>;
    fn count_chapters(&self, novel_slug: &str) -> Result<usize>;
    fn max_chapter_number(&self, novel_slug: &str) -> Result<Option<u32>>;

    // Queue operations
    /// Create a queue item. `None` models a producer that wrote no url field.
    fn enqueue(&self, url: Option<&str>) -> Result<QueueItem>;
    fn get_queue_item(&self, id: &str) -> Result<Option<QueueItem>>;
    /// Snapshot of every queued item, oldest first.
    fn list_queue(&self) -> Result<Vec<QueueItem>>;
    /// Deleting an id that is already gone is not an error.
    fn delete_queue_item(&self, id: &str) -> Result<()>;
}
