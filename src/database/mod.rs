/*!
 * Database module for persistent local storage.
 *
 * This module provides SQLite-based persistence for:
 * - Daily content items (accumulating local history with favorites)
 * - The translation cache keyed by (source text, target language)
 * - Sync scheduler bookkeeping
 */

// Allow dead code and unused imports - database types are for library consumers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod schema;
pub mod connection;
pub mod content_store;
pub mod translation_store;
pub mod sync_state;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use content_store::ContentStore;
pub use translation_store::TranslationStore;
pub use sync_state::SyncStateStore;
pub use models::{ApodRecord, MediaKind, TranslationRecord};
