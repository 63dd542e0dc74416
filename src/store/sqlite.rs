use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{NovelsyncError, Result};
use crate::domain::novel::NovelMetadata;
use crate::domain::{Chapter, Novel, NovelRecord, QueueItem};
use crate::store::Store;

const NOVEL_COLUMNS: &str = "slug, novel_url, title, author, genre, status, synopsis, cover_url, \
     tags, created_at, updated_at";

const CHAPTER_COLUMNS: &str = "slug, chapter_number, title, url, content";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| NovelsyncError::Other(format!("store lock poisoned: {e}")))
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
    }

    /// Read a stored timestamp column; an unparseable value fails the row.
    fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let raw: String = row.get(idx)?;
        Self::parse_datetime(&raw)
            .ok_or_else(|| Self::conversion_error(idx, format!("invalid timestamp: {raw:?}")))
    }

    fn optional_timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
        match row.get::<_, Option<String>>(idx)? {
            Some(_) => Self::timestamp_at(row, idx).map(Some),
            None => Ok(None),
        }
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn novel_from_row(row: &Row<'_>) -> rusqlite::Result<Novel> {
        let raw_tags: String = row.get(8)?;
        let tags: Vec<String> = serde_json::from_str(&raw_tags)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;
        Ok(Novel {
            slug: row.get(0)?,
            novel_url: row.get(1)?,
            meta: NovelMetadata {
                title: row.get(2)?,
                author: row.get(3)?,
                genre: row.get(4)?,
                status: row.get(5)?,
                synopsis: row.get(6)?,
                cover_url: row.get(7)?,
                tags,
            },
            created_at: Self::timestamp_at(row, 9)?,
            updated_at: Self::optional_timestamp_at(row, 10)?,
        })
    }

    fn chapter_from_row(row: &Row<'_>) -> rusqlite::Result<Chapter> {
        Ok(Chapter {
            slug: row.get(0)?,
            chapter_number: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            content: row.get(4)?,
        })
    }

    fn queue_item_from_row(row: &Row<'_>) -> rusqlite::Result<QueueItem> {
        Ok(QueueItem {
            id: row.get(0)?,
            url: row.get(1)?,
            created_at: Self::timestamp_at(row, 2)?,
        })
    }

    fn write_chapters(&self, novel_slug: &str, chapters: &[Chapter], touch: bool) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO chapters
                 (novel_slug, slug, chapter_number, title, url, content)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for chapter in chapters {
                stmt.execute(params![
                    novel_slug,
                    chapter.slug,
                    chapter.chapter_number,
                    chapter.title,
                    chapter.url,
                    chapter.content,
                ])?;
            }
        }

        if touch {
            tx.execute(
                "UPDATE novels SET updated_at = ?1 WHERE slug = ?2",
                params![Self::now(), novel_slug],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

impl Store for SqliteStore {
    fn get_novel(&self, slug: &str) -> Result<Option<Novel>> {
        let conn = self.conn()?;

        let novel = conn
            .query_row(
                &format!("SELECT {NOVEL_COLUMNS} FROM novels WHERE slug = ?1"),
                params![slug],
                Self::novel_from_row,
            )
            .optional()?;

        Ok(novel)
    }

    fn merge_novel(&self, record: &NovelRecord) -> Result<()> {
        let conn = self.conn()?;
        let meta = &record.meta;
        let tags = serde_json::to_string(&meta.tags)?;

        conn.execute(
            "INSERT INTO novels
             (slug, novel_url, title, author, genre, status, synopsis, cover_url, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(slug) DO UPDATE SET
                novel_url = excluded.novel_url,
                title = excluded.title,
                author = excluded.author,
                genre = excluded.genre,
                status = excluded.status,
                synopsis = excluded.synopsis,
                cover_url = excluded.cover_url,
                tags = excluded.tags",
            params![
                record.slug,
                record.novel_url,
                meta.title,
                meta.author,
                meta.genre,
                meta.status,
                meta.synopsis,
                meta.cover_url,
                tags,
            ],
        )?;

        Ok(())
    }

    fn list_novels(&self) -> Result<Vec<Novel>> {
        let conn = self.conn()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {NOVEL_COLUMNS} FROM novels ORDER BY created_at, slug"))?;
        let novels = stmt
            .query_map([], Self::novel_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(novels)
    }

    fn commit_chapters(&self, novel_slug: &str, chapters: &[Chapter]) -> Result<()> {
        self.write_chapters(novel_slug, chapters, false)
    }

    fn append_chapters(&self, novel_slug: &str, chapters: &[Chapter]) -> Result<()> {
        self.write_chapters(novel_slug, chapters, true)
    }

    fn list_chapters(&self, novel_slug: &str) -> Result<Vec<Chapter>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE novel_slug = ?1 ORDER BY chapter_number"
        ))?;
        let chapters = stmt
            .query_map(params![novel_slug], Self::chapter_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(chapters)
    }

    fn count_chapters(&self, novel_slug: &str) -> Result<usize> {
        let conn = self.conn()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chapters WHERE novel_slug = ?1",
            params![novel_slug],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }

    fn max_chapter_number(&self, novel_slug: &str) -> Result<Option<u32>> {
        let conn = self.conn()?;

        let max: Option<u32> = conn.query_row(
            "SELECT MAX(chapter_number) FROM chapters WHERE novel_slug = ?1",
            params![novel_slug],
            |row| row.get(0),
        )?;

        Ok(max)
    }

    fn enqueue(&self, url: Option<&str>) -> Result<QueueItem> {
        let conn = self.conn()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        let created_at = Self::now();

        conn.execute(
            "INSERT INTO scraping_queue (id, url, created_at) VALUES (?1, ?2, ?3)",
            params![id, url, created_at],
        )?;

        Ok(QueueItem {
            id,
            url: url.map(String::from),
            created_at: Self::parse_datetime(&created_at).unwrap_or_else(Utc::now),
        })
    }

    fn get_queue_item(&self, id: &str) -> Result<Option<QueueItem>> {
        let conn = self.conn()?;

        let item = conn
            .query_row(
                "SELECT id, url, created_at FROM scraping_queue WHERE id = ?1",
                params![id],
                Self::queue_item_from_row,
            )
            .optional()?;

        Ok(item)
    }

    fn list_queue(&self) -> Result<Vec<QueueItem>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, url, created_at FROM scraping_queue ORDER BY created_at, rowid",
        )?;
        let items = stmt
            .query_map([], Self::queue_item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn delete_queue_item(&self, id: &str) -> Result<()> {
        let conn = self.conn()?;

        conn.execute("DELETE FROM scraping_queue WHERE id = ?1", params![id])?;
        Ok(())
    }
}
