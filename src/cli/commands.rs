use std::io::Read;
use std::path::Path;

use crate::app::{AppContext, Result};
use crate::pipeline::ScrapeOutcome;
use crate::queue::{self, EventOutcome, QueueEvent};

fn report(outcome: &ScrapeOutcome) {
    match outcome {
        ScrapeOutcome::AlreadyExists { title, slug } => {
            println!("Already stored: {} ({})", title, slug)
        }
        ScrapeOutcome::Completed {
            title,
            slug,
            chapters,
        } => println!("Scraped {} ({}): {} chapters", title, slug, chapters),
        ScrapeOutcome::LandingPageFailed { url, error } => {
            eprintln!("Failed to fetch {}: {}", url, error)
        }
    }
}

pub async fn scrape(ctx: &AppContext, url: &str) -> Result<bool> {
    let outcome = ctx.scraper().scrape(url).await?;
    report(&outcome);
    Ok(outcome.is_success())
}

pub fn enqueue(ctx: &AppContext, url: &str) -> Result<()> {
    let item = ctx.store.enqueue(Some(url))?;
    println!("Queued {} as {}", url, item.id);
    Ok(())
}

/// Read one event from `path`, or stdin when `None`, and process it.
pub async fn process_event(ctx: &AppContext, path: Option<&Path>) -> Result<()> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let event: QueueEvent = serde_json::from_str(&raw)?;

    match queue::process_event(ctx, &event).await? {
        EventOutcome::Scraped(outcome) => report(&outcome),
        EventOutcome::DiscardedMalformed => println!("Discarded malformed queue item"),
        EventOutcome::DiscardedEmpty => println!("Discarded queue item with empty url"),
    }
    Ok(())
}

pub async fn drain_backlog(ctx: &AppContext) -> Result<()> {
    let summary = queue::drain_backlog(ctx).await?;

    if summary.total == 0 {
        println!("Queue is empty");
        return Ok(());
    }

    println!(
        "Processed {} items: {} scraped, {} failed, {} skipped",
        summary.total, summary.scraped, summary.failed, summary.skipped
    );
    Ok(())
}

pub async fn update_novels(ctx: &AppContext) -> Result<()> {
    let summary = ctx.scraper().update_all().await?;

    if summary.novels_checked == 0 {
        println!("No novels to update");
        return Ok(());
    }

    println!(
        "Update complete: {} novels checked, {} new chapters, {} errors",
        summary.novels_checked, summary.chapters_added, summary.failures
    );
    Ok(())
}

pub fn list_novels(ctx: &AppContext) -> Result<()> {
    let novels = ctx.store.list_novels()?;

    if novels.is_empty() {
        println!("No novels");
        return Ok(());
    }

    for novel in novels {
        let chapters = ctx.store.count_chapters(&novel.slug)?;
        println!(
            "{} [{}] ({} chapters)\n  {}\n  tags: {}",
            novel.display_title(),
            novel.meta.genre,
            chapters,
            novel.slug,
            novel.meta.tags.join(", ")
        );
    }

    Ok(())
}

pub fn list_chapters(ctx: &AppContext, slug: &str) -> Result<()> {
    let chapters = ctx.store.list_chapters(slug)?;

    if chapters.is_empty() {
        println!("No chapters for {}", slug);
        return Ok(());
    }

    for chapter in chapters {
        println!("{:>5}  {}", chapter.chapter_number, chapter.title);
    }

    Ok(())
}
