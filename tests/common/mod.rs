/*!
 * Common test utilities for the astropod test suite
 *
 * This module provides mock implementations of the network-facing traits
 * to avoid external API calls in tests, plus a recording notifier. Each
 * mock tracks its invocations so tests can assert exactly how often the
 * network would have been touched.
 */

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use astropod::apod::client::ApodFetch;
use astropod::database::models::{ApodRecord, MediaKind, TranslationRecord};
use astropod::errors::{ContentError, TranslationError};
use astropod::language_utils;
use astropod::notify::Notifier;
use astropod::sync::Connectivity;
use astropod::translation::TranslateApi;

/// Build a deterministic content item for a date
pub fn make_item(date: &str) -> ApodRecord {
    ApodRecord {
        date: date.to_string(),
        title: format!("Item {}", date),
        explanation: format!("Explanation for {}", date),
        url: format!("https://example.com/{}.jpg", date),
        media_type: MediaKind::Image,
        thumbnail_url: None,
        copyright: None,
        hd_url: None,
        is_favorite: false,
    }
}

/// Behavior mode for the mock translation client
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockTranslateBehavior {
    /// Always succeeds, translating to "[target] text"
    Working,
    /// Always fails as if all retries hit 429
    RateLimited,
    /// Always fails with a terminal HTTP status
    HttpError(u16),
    /// Always fails as if the network was unreachable
    Transport,
}

/// Mock translation client with call tracking
pub struct MockTranslateApi {
    behavior: MockTranslateBehavior,
    /// Number of single translate invocations, including those made
    /// through the batch path
    call_count: Arc<AtomicUsize>,
    /// Number of batch invocations
    batch_call_count: Arc<AtomicUsize>,
    /// Texts passed to the most recent batch call
    last_batch: Arc<Mutex<Vec<String>>>,
}

/// Shared view of a mock client's call counters, usable after the mock
/// itself has been moved into a repository
#[derive(Clone)]
pub struct CallCounters {
    call_count: Arc<AtomicUsize>,
    batch_call_count: Arc<AtomicUsize>,
    last_batch: Arc<Mutex<Vec<String>>>,
}

impl CallCounters {
    pub fn single_calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_call_count.load(Ordering::SeqCst)
    }

    pub fn last_batch(&self) -> Vec<String> {
        self.last_batch.lock().unwrap().clone()
    }
}

impl MockTranslateApi {
    pub fn new(behavior: MockTranslateBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            batch_call_count: Arc::new(AtomicUsize::new(0)),
            last_batch: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockTranslateBehavior::Working)
    }

    /// Handle on the counters that survives moving the mock into a repository
    pub fn clone_counters(&self) -> CallCounters {
        CallCounters {
            call_count: Arc::clone(&self.call_count),
            batch_call_count: Arc::clone(&self.batch_call_count),
            last_batch: Arc::clone(&self.last_batch),
        }
    }

    fn fail(&self) -> TranslationError {
        match self.behavior {
            MockTranslateBehavior::RateLimited => TranslationError::RateLimited { attempts: 5 },
            MockTranslateBehavior::HttpError(code) => TranslationError::HttpError(code),
            MockTranslateBehavior::Transport => {
                TranslationError::TransportError("simulated network failure".to_string())
            }
            MockTranslateBehavior::Working => unreachable!(),
        }
    }
}

#[async_trait]
impl TranslateApi for MockTranslateApi {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<TranslationRecord, TranslationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.behavior != MockTranslateBehavior::Working {
            return Err(self.fail());
        }

        Ok(TranslationRecord::new(
            text,
            language_utils::normalize_source(source_language),
            target_language.to_lowercase(),
            format!("[{}] {}", target_language, text),
        ))
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationRecord>, TranslationError> {
        self.batch_call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_batch.lock().unwrap() = texts.to_vec();

        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text, target_language, source_language).await?);
        }
        Ok(results)
    }
}

/// Mock content client generating deterministic items, with call tracking.
///
/// Clones share all state, so a clone can move into a repository while the
/// original keeps access to the counters.
#[derive(Clone)]
pub struct MockApodFetch {
    /// Preset items by date, overriding the generated ones
    items: Arc<Mutex<HashMap<String, ApodRecord>>>,
    /// Whether every call should fail with a transport error
    fail: Arc<AtomicBool>,
    fetch_calls: Arc<AtomicUsize>,
    range_calls: Arc<AtomicUsize>,
    count_calls: Arc<AtomicUsize>,
    /// API key seen on the most recent call
    last_api_key: Arc<Mutex<String>>,
}

impl MockApodFetch {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(HashMap::new())),
            fail: Arc::new(AtomicBool::new(false)),
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            range_calls: Arc::new(AtomicUsize::new(0)),
            count_calls: Arc::new(AtomicUsize::new(0)),
            last_api_key: Arc::new(Mutex::new(String::new())),
        }
    }

    /// Preset a specific item
    pub fn with_item(self, item: ApodRecord) -> Self {
        self.items.lock().unwrap().insert(item.date.clone(), item);
        self
    }

    /// Make every subsequent call fail
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn range_calls(&self) -> usize {
        self.range_calls.load(Ordering::SeqCst)
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn last_api_key(&self) -> String {
        self.last_api_key.lock().unwrap().clone()
    }

    fn item_for(&self, date: &str) -> ApodRecord {
        self.items
            .lock()
            .unwrap()
            .get(date)
            .cloned()
            .unwrap_or_else(|| make_item(date))
    }

    fn check_failure(&self) -> Result<(), ContentError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(ContentError::TransportError(
                "simulated network failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl Default for MockApodFetch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApodFetch for MockApodFetch {
    async fn fetch(&self, api_key: &str, date: &str) -> Result<ApodRecord, ContentError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_api_key.lock().unwrap() = api_key.to_string();
        self.check_failure()?;

        Ok(self.item_for(date))
    }

    async fn fetch_range(
        &self,
        api_key: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ApodRecord>, ContentError> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_api_key.lock().unwrap() = api_key.to_string();
        self.check_failure()?;

        let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
            .map_err(|e| ContentError::TransportError(e.to_string()))?;
        let end = NaiveDate::parse_from_str(end_date, "%Y-%m-%d")
            .map_err(|e| ContentError::TransportError(e.to_string()))?;

        let mut items = Vec::new();
        let mut current = start;
        while current <= end {
            items.push(self.item_for(&current.format("%Y-%m-%d").to_string()));
            current = current.succ_opt().expect("date overflow");
        }
        Ok(items)
    }

    async fn fetch_count(&self, api_key: &str, count: u32) -> Result<Vec<ApodRecord>, ContentError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_api_key.lock().unwrap() = api_key.to_string();
        self.check_failure()?;

        Ok((0..count)
            .map(|i| make_item(&format!("2000-01-{:02}", i + 1)))
            .collect())
    }
}

/// A recorded notification
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedNotification {
    NewItem { date: String },
    KeywordMatch { date: String, keyword: String },
}

/// Notifier that records every emission for later assertions
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<RecordedNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<RecordedNotification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn new_item_count(&self) -> usize {
        self.all()
            .iter()
            .filter(|n| matches!(n, RecordedNotification::NewItem { .. }))
            .count()
    }

    pub fn keyword_matches(&self) -> Vec<String> {
        self.all()
            .iter()
            .filter_map(|n| match n {
                RecordedNotification::KeywordMatch { keyword, .. } => Some(keyword.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn new_item(&self, item: &ApodRecord) {
        self.notifications
            .lock()
            .unwrap()
            .push(RecordedNotification::NewItem {
                date: item.date.clone(),
            });
    }

    fn keyword_match(&self, item: &ApodRecord, keyword: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(RecordedNotification::KeywordMatch {
                date: item.date.clone(),
                keyword: keyword.to_string(),
            });
    }
}

/// Connectivity stub with a fixed verdict
pub struct FixedConnectivity {
    online: bool,
}

impl FixedConnectivity {
    pub fn online() -> Self {
        Self { online: true }
    }

    pub fn offline() -> Self {
        Self { online: false }
    }
}

#[async_trait]
impl Connectivity for FixedConnectivity {
    async fn is_online(&self) -> bool {
        self.online
    }
}
