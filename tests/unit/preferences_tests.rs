/*!
 * Tests for the preference store
 */

use tempfile::TempDir;

use astropod::preferences::{Preferences, DEFAULT_API_KEY, DEFAULT_SCREEN_SAVER_DELAY_SECS};

fn temp_store() -> (TempDir, Preferences) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let prefs =
        Preferences::load(dir.path().join("prefs.json")).expect("Failed to load preferences");
    (dir, prefs)
}

#[test]
fn test_load_withMissingFile_shouldUseDefaults() {
    let (_dir, prefs) = temp_store();
    let snapshot = prefs.snapshot();

    assert!(!snapshot.dark_theme);
    assert!(snapshot.notifications_enabled);
    assert!(snapshot.watched_keywords.is_empty());
    assert!(snapshot.api_key.is_none());
    assert_eq!(snapshot.screen_saver_delay_secs, DEFAULT_SCREEN_SAVER_DELAY_SECS);
    assert_eq!(snapshot.app_language, "");
    assert!(snapshot.recent_languages.is_empty());
}

#[test]
fn test_mutations_shouldSurviveReload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let prefs = Preferences::load(&path).unwrap();
        prefs.set_dark_theme(true).unwrap();
        prefs.set_screen_saver_delay(60).unwrap();
        prefs.add_watched_keyword("nebula").unwrap();
        prefs.set_notifications_enabled(false).unwrap();
    }

    let reloaded = Preferences::load(&path).unwrap();
    let snapshot = reloaded.snapshot();

    assert!(snapshot.dark_theme);
    assert_eq!(snapshot.screen_saver_delay_secs, 60);
    assert!(snapshot.watched_keywords.contains("nebula"));
    assert!(!snapshot.notifications_enabled);
}

#[test]
fn test_apiKey_shouldFallBackToBuiltInDefault() {
    let (_dir, prefs) = temp_store();

    assert_eq!(prefs.api_key(), DEFAULT_API_KEY);

    prefs.set_api_key("custom-key").unwrap();
    assert_eq!(prefs.api_key(), "custom-key");

    // Blank clears the override
    prefs.set_api_key("   ").unwrap();
    assert_eq!(prefs.api_key(), DEFAULT_API_KEY);
    assert!(prefs.snapshot().api_key.is_none());
}

#[test]
fn test_watchedKeywords_shouldTrimAndDeduplicate() {
    let (_dir, prefs) = temp_store();

    prefs.add_watched_keyword("  nebula  ").unwrap();
    prefs.add_watched_keyword("nebula").unwrap();
    prefs.add_watched_keyword("").unwrap();

    let snapshot = prefs.snapshot();
    assert_eq!(snapshot.watched_keywords.len(), 1);
    assert!(snapshot.watched_keywords.contains("nebula"));

    prefs.remove_watched_keyword(" nebula ").unwrap();
    assert!(prefs.snapshot().watched_keywords.is_empty());
}

#[test]
fn test_recentLanguages_shouldCapAtFiveMostRecent() {
    let (_dir, prefs) = temp_store();

    for code in ["fr", "de", "es", "it", "pt", "tr"] {
        prefs.add_recent_language(code).unwrap();
    }

    let snapshot = prefs.snapshot();
    assert_eq!(snapshot.recent_languages, vec!["de", "es", "it", "pt", "tr"]);
}

#[test]
fn test_recentLanguages_shouldMoveRepeatedLanguageToEnd() {
    let (_dir, prefs) = temp_store();

    prefs.add_recent_language("fr").unwrap();
    prefs.add_recent_language("de").unwrap();
    prefs.add_recent_language("fr").unwrap();

    let snapshot = prefs.snapshot();
    assert_eq!(snapshot.recent_languages, vec!["de", "fr"]);
}

#[tokio::test]
async fn test_subscribe_shouldObserveUpdates() {
    let (_dir, prefs) = temp_store();
    let mut rx = prefs.subscribe();

    // The receiver starts with the current snapshot
    assert!(!rx.borrow().dark_theme);

    prefs.set_dark_theme(true).unwrap();

    rx.changed().await.expect("Sender dropped unexpectedly");
    assert!(rx.borrow().dark_theme);
}

#[tokio::test]
async fn test_subscribe_shouldSeeLatestValueAfterMultipleUpdates() {
    let (_dir, prefs) = temp_store();
    let mut rx = prefs.subscribe();

    prefs.add_watched_keyword("galaxy").unwrap();
    prefs.add_watched_keyword("nebula").unwrap();

    rx.changed().await.expect("Sender dropped unexpectedly");
    let keywords = rx.borrow_and_update().watched_keywords.clone();
    assert!(keywords.contains("galaxy"));
    assert!(keywords.contains("nebula"));
}
