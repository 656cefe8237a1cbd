/*!
 * The daily sync run.
 *
 * One run refreshes today's item, raises notifications per user
 * preferences, and refreshes the trailing week of history for offline
 * browsing. Notification emission never fails the run; any fetch error
 * does, and the scheduler turns that into a retry.
 */

use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::apod::client::ApodFetch;
use crate::apod::repository::ApodRepository;
use crate::database::models::ApodRecord;
use crate::date_utils;
use crate::errors::AppError;
use crate::notify::Notifier;
use crate::preferences::Preferences;

/// How many trailing days each run keeps warm in the local store
const HISTORY_REFRESH_DAYS: i64 = 7;

/// Executes a single sync cycle
pub struct SyncWorker<F: ApodFetch> {
    /// Content repository
    repository: Arc<ApodRepository<F>>,
    /// Preference store for the notification settings
    preferences: Arc<Preferences>,
    /// Notification sink
    notifier: Arc<dyn Notifier>,
}

/// First watched keyword found in the item's title or explanation.
///
/// Matching is case-insensitive substring containment; at most one keyword
/// wins so a single item never produces a notification burst.
fn first_keyword_match(item: &ApodRecord, keywords: &BTreeSet<String>) -> Option<String> {
    if keywords.is_empty() {
        return None;
    }

    let haystack = format!(
        "{} {}",
        item.title.to_lowercase(),
        item.explanation.to_lowercase()
    );

    keywords
        .iter()
        .find(|keyword| {
            let needle = keyword.trim().to_lowercase();
            !needle.is_empty() && haystack.contains(&needle)
        })
        .cloned()
}

impl<F: ApodFetch> SyncWorker<F> {
    /// Create a new worker
    pub fn new(
        repository: Arc<ApodRepository<F>>,
        preferences: Arc<Preferences>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            preferences,
            notifier,
        }
    }

    /// Run one sync cycle
    pub async fn run_once(&self) -> Result<(), AppError> {
        let today = date_utils::today_key();
        info!("Sync run starting for {}", today);

        let item = self.repository.refresh(&today).await?;

        let prefs = self.preferences.snapshot();
        if prefs.notifications_enabled {
            self.notifier.new_item(&item);

            if let Some(keyword) = first_keyword_match(&item, &prefs.watched_keywords) {
                self.notifier.keyword_match(&item, &keyword);
            }
        } else {
            debug!("Notifications disabled, skipping");
        }

        // Keep the trailing week browseable offline, independent of the
        // notification outcome
        let start = date_utils::days_before(&today, HISTORY_REFRESH_DAYS)
            .map_err(|e| AppError::Unknown(e.to_string()))?;
        let refreshed = self.repository.refresh_range(&start, &today).await?;

        info!("Sync run complete: {} items refreshed", refreshed.len());
        Ok(())
    }
}
