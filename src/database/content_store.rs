/*!
 * Persistent store for daily content items.
 *
 * Items are upserted by date key on every successful fetch. The favorite
 * flag is owned by the user, so an upsert never writes it: a re-fetch of an
 * already-favorited date leaves the flag set.
 */

use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use super::connection::DatabaseConnection;
use super::models::{ApodRecord, MediaKind};

/// Store for content item rows
#[derive(Clone)]
pub struct ContentStore {
    /// Database connection
    db: DatabaseConnection,
}

fn parse_row(row: &Row) -> rusqlite::Result<ApodRecord> {
    Ok(ApodRecord {
        date: row.get(0)?,
        title: row.get(1)?,
        explanation: row.get(2)?,
        url: row.get(3)?,
        media_type: row
            .get::<_, String>(4)?
            .parse()
            .unwrap_or(MediaKind::Image),
        thumbnail_url: row.get(5)?,
        copyright: row.get(6)?,
        hd_url: row.get(7)?,
        is_favorite: row.get::<_, i64>(8)? != 0,
    })
}

const SELECT_COLUMNS: &str =
    "date, title, explanation, url, media_type, thumbnail_url, copyright, hd_url, is_favorite";

fn upsert_sql() -> String {
    // is_favorite is deliberately absent from the update list
    r#"
    INSERT INTO apods (date, title, explanation, url, media_type, thumbnail_url, copyright, hd_url, is_favorite)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)
    ON CONFLICT(date) DO UPDATE SET
        title = excluded.title,
        explanation = excluded.explanation,
        url = excluded.url,
        media_type = excluded.media_type,
        thumbnail_url = excluded.thumbnail_url,
        copyright = excluded.copyright,
        hd_url = excluded.hd_url
    "#
    .to_string()
}

impl ContentStore {
    /// Create a new store over the given connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert or replace a single item, preserving any existing favorite flag
    pub async fn upsert(&self, item: &ApodRecord) -> Result<()> {
        let item = item.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    &upsert_sql(),
                    params![
                        item.date,
                        item.title,
                        item.explanation,
                        item.url,
                        item.media_type.to_string(),
                        item.thumbnail_url,
                        item.copyright,
                        item.hd_url,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Batched upsert inside a single transaction
    pub async fn upsert_many(&self, items: Vec<ApodRecord>) -> Result<()> {
        self.db
            .transaction_async(move |tx| {
                let sql = upsert_sql();
                for item in items {
                    tx.execute(
                        &sql,
                        params![
                            item.date,
                            item.title,
                            item.explanation,
                            item.url,
                            item.media_type.to_string(),
                            item.thumbnail_url,
                            item.copyright,
                            item.hd_url,
                        ],
                    )?;
                }
                Ok(())
            })
            .await
    }

    /// Get a single item by date key
    pub async fn get(&self, date: &str) -> Result<Option<ApodRecord>> {
        let date = date.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        &format!("SELECT {} FROM apods WHERE date = ?1", SELECT_COLUMNS),
                        [&date],
                        parse_row,
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// Get the most recent items, newest first
    pub async fn recent(&self, limit: usize) -> Result<Vec<ApodRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM apods ORDER BY date DESC LIMIT ?1",
                    SELECT_COLUMNS
                ))?;
                let items = stmt
                    .query_map([limit as i64], parse_row)?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(items)
            })
            .await
    }

    /// Get items between two date keys (inclusive), newest first
    pub async fn between(&self, start_date: &str, end_date: &str) -> Result<Vec<ApodRecord>> {
        let start_date = start_date.to_string();
        let end_date = end_date.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM apods WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC",
                    SELECT_COLUMNS
                ))?;
                let items = stmt
                    .query_map(params![start_date, end_date], parse_row)?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(items)
            })
            .await
    }

    /// Get all favorited items, newest first
    pub async fn favorites(&self) -> Result<Vec<ApodRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM apods WHERE is_favorite = 1 ORDER BY date DESC",
                    SELECT_COLUMNS
                ))?;
                let items = stmt
                    .query_map([], parse_row)?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(items)
            })
            .await
    }

    /// Case-insensitive substring search over title and explanation
    pub async fn search(&self, keyword: &str) -> Result<Vec<ApodRecord>> {
        let pattern = format!("%{}%", keyword);

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM apods WHERE title LIKE ?1 OR explanation LIKE ?1 ORDER BY date DESC",
                    SELECT_COLUMNS
                ))?;
                let items = stmt
                    .query_map([&pattern], parse_row)?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(items)
            })
            .await
    }

    /// Set or clear the favorite flag for a date
    ///
    /// Returns false when no row exists for the date.
    pub async fn set_favorite(&self, date: &str, is_favorite: bool) -> Result<bool> {
        let date = date.to_string();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    "UPDATE apods SET is_favorite = ?1 WHERE date = ?2",
                    params![is_favorite as i64, date],
                )?;
                Ok(changed > 0)
            })
            .await
    }

    /// Total number of stored items
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM apods", [], |row| row.get(0))?)
            })
            .await
    }
}
