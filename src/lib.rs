//! # novelsync
//!
//! Crawls a web-novel site, extracts each novel's metadata and full chapter
//! list, and stores both in a local document store. Work arrives through a
//! scraping queue, either one creation event at a time or as a backlog drain.
//!
//! ## Architecture
//!
//! ```text
//! Queue → Orchestrator → Fetcher → Extract → Store
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape a novel directly
//! novelsync scrape https://novelfull.net/some-novel.html
//!
//! # Queue a novel and drain the queue
//! novelsync enqueue https://novelfull.net/some-novel.html
//! novelsync backlog
//!
//! # Pick up newly published chapters
//! novelsync update
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) holds the store and fetcher handles that
/// every driver and command receives.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/novelsync/config.toml`.
pub mod config;

/// Queue watcher: `novelsync daemon start|stop|status`.
pub mod daemon;

/// Core domain models.
///
/// - [`Novel`](domain::Novel) and [`NovelMetadata`](domain::NovelMetadata)
/// - [`Chapter`](domain::Chapter)
/// - [`QueueItem`](domain::QueueItem)
pub mod domain;

/// Best-effort HTML extraction for the novel site.
pub mod extract;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`RequestDelay`](fetcher::RequestDelay): pause before chapter requests
pub mod fetcher;

/// Scrape orchestration and the update pass.
pub mod pipeline;

/// Event-triggered and backlog queue drivers.
pub mod queue;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
