/*!
 * Persistent cache for translation results.
 *
 * Records are keyed by the (source text, target language) pair; a new
 * translation for the same pair replaces the old one. The store keeps the
 * timestamp but does not enforce expiry on read - freshness is the
 * caller's decision. `purge_older_than` is available for maintenance but
 * is never invoked automatically.
 */

use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};

use super::connection::DatabaseConnection;
use super::models::TranslationRecord;

/// Store for cached translations
#[derive(Clone)]
pub struct TranslationStore {
    /// Database connection
    db: DatabaseConnection,
}

fn parse_row(row: &Row) -> rusqlite::Result<TranslationRecord> {
    Ok(TranslationRecord {
        source_text: row.get(0)?,
        source_language: row.get(1)?,
        target_language: row.get(2)?,
        translated_text: row.get(3)?,
        timestamp_ms: row.get(4)?,
    })
}

const UPSERT_SQL: &str = r#"
    INSERT INTO translations (source_text_hash, source_text, source_language, target_language, translated_text, timestamp_ms)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(source_text_hash, target_language) DO UPDATE SET
        source_text = excluded.source_text,
        source_language = excluded.source_language,
        translated_text = excluded.translated_text,
        timestamp_ms = excluded.timestamp_ms
"#;

impl TranslationStore {
    /// Create a new store over the given connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Compute SHA256 hash of text
    pub fn hash_text(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Exact-match lookup by (source text, target language)
    pub async fn get(
        &self,
        source_text: &str,
        target_language: &str,
    ) -> Result<Option<TranslationRecord>> {
        let hash = Self::hash_text(source_text);
        let source_text = source_text.to_string();
        let target_language = target_language.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT source_text, source_language, target_language, translated_text, timestamp_ms
                        FROM translations
                        WHERE source_text_hash = ?1 AND target_language = ?2 AND source_text = ?3
                        "#,
                        params![hash, target_language, source_text],
                        parse_row,
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// Upsert a single record, replacing any existing record for the key pair
    pub async fn put(&self, record: &TranslationRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    UPSERT_SQL,
                    params![
                        Self::hash_text(&record.source_text),
                        record.source_text,
                        record.source_language,
                        record.target_language,
                        record.translated_text,
                        record.timestamp_ms,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Batched upsert inside a single transaction
    pub async fn put_many(&self, records: Vec<TranslationRecord>) -> Result<()> {
        self.db
            .transaction_async(move |tx| {
                for record in records {
                    tx.execute(
                        UPSERT_SQL,
                        params![
                            Self::hash_text(&record.source_text),
                            record.source_text,
                            record.source_language,
                            record.target_language,
                            record.translated_text,
                            record.timestamp_ms,
                        ],
                    )?;
                }
                Ok(())
            })
            .await
    }

    /// Delete all records with a timestamp strictly below the cutoff
    ///
    /// Returns the number of deleted rows.
    pub async fn purge_older_than(&self, cutoff_timestamp_ms: i64) -> Result<i64> {
        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute(
                    "DELETE FROM translations WHERE timestamp_ms < ?1",
                    [cutoff_timestamp_ms],
                )?;
                Ok(deleted as i64)
            })
            .await
    }

    /// Delete all records
    pub async fn clear(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let deleted = conn.execute("DELETE FROM translations", [])?;
                Ok(deleted as i64)
            })
            .await
    }

    /// Number of cached records
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))?)
            })
            .await
    }
}
