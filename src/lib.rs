/*!
 * # astropod
 *
 * A Rust library and CLI for browsing NASA's Astronomy Picture of the Day:
 * local history with favorites, caption translation with a persistent
 * cache, and a daily background sync with keyword notifications.
 *
 * ## Features
 *
 * - Fetch daily items by date, date range, or random count
 * - Accumulate a browseable local history with favorites and search
 * - Translate captions through an unauthenticated endpoint, tolerating
 *   rate limits with exponential backoff
 * - Cache translations for a week, keyed by (text, target language)
 * - Daily sync with new-item and keyword-match notifications
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `apod`: Content endpoint client and store-first repository
 * - `translation`: Translation pipeline:
 *   - `translation::client`: Endpoint client with retry and backoff
 *   - `translation::parser`: Heuristic payload parsing
 *   - `translation::repository`: Cache-then-network orchestration
 * - `database`: SQLite persistence (items, translation cache, sync state)
 * - `preferences`: User preference store with update subscriptions
 * - `sync`: Periodic sync worker, scheduler, and connectivity probe
 * - `notify`: Notification seam for the sync job
 * - `date_utils`: Date key helpers
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod apod;
pub mod database;
pub mod date_utils;
pub mod errors;
pub mod language_utils;
pub mod notify;
pub mod preferences;
pub mod sync;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use apod::{ApodFetch, ApodRepository, NasaClient};
pub use database::{ApodRecord, DatabaseConnection, MediaKind, TranslationRecord};
pub use errors::{AppError, ContentError, TranslationError};
pub use preferences::{Preferences, PreferencesSnapshot};
pub use sync::{SyncScheduler, SyncWorker};
pub use translation::{TranslateApi, TranslateClient, TranslationRepository};
