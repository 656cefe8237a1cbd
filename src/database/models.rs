/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media kind of a daily content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still image
    Image,
    /// Embedded video
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(anyhow::anyhow!("Invalid media kind: {}", s)),
        }
    }
}

/// Daily content item record
///
/// Rows are keyed by their date string and accumulate as browseable local
/// history; a re-fetch replaces every column except `is_favorite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApodRecord {
    /// Date key, `YYYY-MM-DD` (primary key)
    pub date: String,
    /// Item title
    pub title: String,
    /// Long-form description
    pub explanation: String,
    /// Primary media URL
    pub url: String,
    /// Media kind
    pub media_type: MediaKind,
    /// Thumbnail URL (videos only)
    pub thumbnail_url: Option<String>,
    /// Attribution, when the media is not public domain
    pub copyright: Option<String>,
    /// High-resolution media URL, when available
    pub hd_url: Option<String>,
    /// User-set favorite flag
    pub is_favorite: bool,
}

/// Cached translation record
///
/// Identity is the (source text, target language) pair; a new translation
/// for the same pair replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Original text
    pub source_text: String,
    /// Resolved source language code, or "auto"
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Translated text
    pub translated_text: String,
    /// Storage timestamp, epoch milliseconds
    pub timestamp_ms: i64,
}

impl TranslationRecord {
    /// Create a new record stamped with the current wall clock
    pub fn new(
        source_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            translated_text: translated_text.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Whether this record is still fresh at `now_ms` under the given window
    pub fn is_fresh_at(&self, now_ms: i64, max_age_ms: i64) -> bool {
        now_ms - self.timestamp_ms < max_age_ms
    }
}
