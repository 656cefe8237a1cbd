/*!
 * Store-first orchestration for daily content items.
 *
 * Reads go to the local store; refresh operations hit the network and
 * write through by date key. Items accumulate as browseable history and
 * are never deleted.
 */

use log::debug;
use std::sync::Arc;

use crate::database::content_store::ContentStore;
use crate::database::models::ApodRecord;
use crate::errors::{AppError, ContentError};
use crate::preferences::Preferences;

use super::client::ApodFetch;

/// Repository composing the content store with the remote endpoint
pub struct ApodRepository<F: ApodFetch> {
    /// Network client
    client: F,
    /// Persistent store
    store: ContentStore,
    /// Preference store, consulted for the API key on every fetch
    preferences: Arc<Preferences>,
}

impl<F: ApodFetch> ApodRepository<F> {
    /// Create a new repository
    pub fn new(client: F, store: ContentStore, preferences: Arc<Preferences>) -> Self {
        Self {
            client,
            store,
            preferences,
        }
    }

    /// Fetch one item from the network and upsert it.
    ///
    /// Returns the stored row, so a previously set favorite flag is
    /// reflected in the result.
    pub async fn refresh(&self, date: &str) -> Result<ApodRecord, AppError> {
        let api_key = self.preferences.api_key();
        let fetched = self.client.fetch(&api_key, date).await?;

        self.store
            .upsert(&fetched)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        self.store
            .get(date)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
            .ok_or_else(|| ContentError::NotFound(date.to_string()).into())
    }

    /// Fetch a date range from the network and upsert every item
    pub async fn refresh_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ApodRecord>, AppError> {
        let api_key = self.preferences.api_key();
        let fetched = self
            .client
            .fetch_range(&api_key, start_date, end_date)
            .await?;

        debug!("Fetched {} items for {}..{}", fetched.len(), start_date, end_date);

        self.store
            .upsert_many(fetched)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        self.store
            .between(start_date, end_date)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    /// Fetch N random items from the network and upsert them
    pub async fn refresh_count(&self, count: u32) -> Result<Vec<ApodRecord>, AppError> {
        let api_key = self.preferences.api_key();
        let fetched = self.client.fetch_count(&api_key, count).await?;

        self.store
            .upsert_many(fetched.clone())
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(fetched)
    }

    /// Get one item, store-first with a network fetch on miss
    pub async fn get(&self, date: &str) -> Result<ApodRecord, AppError> {
        if let Some(item) = self
            .store
            .get(date)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
        {
            return Ok(item);
        }

        debug!("No stored item for {}, fetching", date);
        self.refresh(date).await
    }

    /// Most recent stored items, newest first
    pub async fn recent(&self, limit: usize) -> Result<Vec<ApodRecord>, AppError> {
        self.store
            .recent(limit)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    /// Stored items between two dates, newest first
    pub async fn between(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ApodRecord>, AppError> {
        self.store
            .between(start_date, end_date)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    /// All favorited items, newest first
    pub async fn favorites(&self) -> Result<Vec<ApodRecord>, AppError> {
        self.store
            .favorites()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    /// Case-insensitive search over stored titles and explanations
    pub async fn search(&self, keyword: &str) -> Result<Vec<ApodRecord>, AppError> {
        self.store
            .search(keyword)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    /// Set or clear the favorite flag for a stored item
    pub async fn set_favorite(&self, date: &str, is_favorite: bool) -> Result<(), AppError> {
        let changed = self
            .store
            .set_favorite(date, is_favorite)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if !changed {
            return Err(ContentError::NotFound(date.to_string()).into());
        }
        Ok(())
    }

    /// Number of stored items
    pub async fn count(&self) -> Result<i64, AppError> {
        self.store
            .count()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }
}
