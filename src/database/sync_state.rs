/*!
 * Persisted scheduler bookkeeping.
 *
 * A single-row table records when the last successful sync completed so the
 * daily cadence survives process restarts.
 */

use anyhow::Result;
use rusqlite::OptionalExtension;

use super::connection::DatabaseConnection;

/// Store for the sync scheduler's last-run timestamp
#[derive(Clone)]
pub struct SyncStateStore {
    /// Database connection
    db: DatabaseConnection,
}

impl SyncStateStore {
    /// Create a new store over the given connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Timestamp (epoch milliseconds) of the last successful run, if any
    pub async fn last_run_ms(&self) -> Result<Option<i64>> {
        self.db
            .execute_async(|conn| {
                let result = conn
                    .query_row("SELECT last_run_ms FROM sync_state WHERE id = 1", [], |row| {
                        row.get(0)
                    })
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// Record a successful run
    pub async fn set_last_run_ms(&self, timestamp_ms: i64) -> Result<()> {
        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO sync_state (id, last_run_ms, updated_at) VALUES (1, ?1, datetime('now'))",
                    [timestamp_ms],
                )?;
                Ok(())
            })
            .await
    }
}
