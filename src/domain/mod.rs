pub mod chapter;
pub mod novel;
pub mod queue;
pub mod slug;

pub use chapter::Chapter;
pub use novel::{Novel, NovelMetadata, NovelRecord};
pub use queue::QueueItem;
pub use slug::{canonical_novel_url, slug_from_url};
