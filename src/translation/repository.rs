/*!
 * Cache-then-network orchestration for translations.
 *
 * Lookups hit the persistent cache first; entries younger than the 7-day
 * freshness window are returned without touching the network. A stale
 * entry always triggers a fresh network attempt, and a failed attempt is
 * reported rather than masked with stale data.
 */

use log::debug;
use std::collections::HashMap;

use crate::database::models::TranslationRecord;
use crate::database::translation_store::TranslationStore;
use crate::errors::AppError;

use super::client::TranslateApi;

/// Freshness window for cached translations: 7 days in milliseconds
pub const CACHE_MAX_AGE_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Repository composing the translation cache with the network client
pub struct TranslationRepository<C: TranslateApi> {
    /// Network client
    client: C,
    /// Persistent cache
    cache: TranslationStore,
}

impl<C: TranslateApi> TranslationRepository<C> {
    /// Create a new repository
    pub fn new(client: C, cache: TranslationStore) -> Self {
        Self { client, cache }
    }

    /// Access the underlying cache, for maintenance operations
    pub fn cache(&self) -> &TranslationStore {
        &self.cache
    }

    /// Translate a single text, consulting the cache first.
    ///
    /// A fresh cache hit bypasses the network entirely; otherwise the
    /// client result is written through to the cache before returning.
    pub async fn translate_one(
        &self,
        source_text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<TranslationRecord, AppError> {
        let now_ms = chrono::Utc::now().timestamp_millis();

        if let Some(cached) = self
            .cache
            .get(source_text, target_language)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
        {
            if cached.is_fresh_at(now_ms, CACHE_MAX_AGE_MS) {
                debug!("Translation cache hit for target '{}'", target_language);
                return Ok(cached);
            }
            debug!("Translation cache entry expired, refreshing from network");
        }

        let record = self
            .client
            .translate(source_text, target_language, source_language)
            .await?;

        self.cache
            .put(&record)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(record)
    }

    /// Translate a list of texts, reusing fresh cache entries.
    ///
    /// Output order is cache hits first, then fresh translations in input
    /// order - callers must not rely on output order matching input order.
    /// A batch failure discards all work for this call.
    pub async fn translate_many(
        &self,
        source_texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationRecord>, AppError> {
        if source_texts.is_empty() {
            return Ok(Vec::new());
        }

        let now_ms = chrono::Utc::now().timestamp_millis();

        let mut cache_hits: HashMap<String, TranslationRecord> = HashMap::new();
        let mut to_translate: Vec<String> = Vec::new();

        for text in source_texts {
            match self
                .cache
                .get(text, target_language)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?
            {
                Some(cached) if cached.is_fresh_at(now_ms, CACHE_MAX_AGE_MS) => {
                    cache_hits.insert(text.clone(), cached);
                }
                _ => to_translate.push(text.clone()),
            }
        }

        let mut results: Vec<TranslationRecord> = cache_hits.into_values().collect();

        if to_translate.is_empty() {
            debug!("All {} texts served from translation cache", results.len());
            return Ok(results);
        }

        debug!(
            "{} cache hits, {} texts need translation",
            results.len(),
            to_translate.len()
        );

        let fresh = self
            .client
            .translate_batch(&to_translate, target_language, source_language)
            .await?;

        self.cache
            .put_many(fresh.clone())
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        results.extend(fresh);
        Ok(results)
    }
}
