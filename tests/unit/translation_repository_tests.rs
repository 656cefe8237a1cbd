/*!
 * Tests for the translation repository's cache-then-network behavior
 */

use astropod::database::models::TranslationRecord;
use astropod::database::{DatabaseConnection, TranslationStore};
use astropod::errors::{AppError, TranslationError};
use astropod::translation::{TranslationRepository, CACHE_MAX_AGE_MS};

use crate::common::{MockTranslateApi, MockTranslateBehavior};

fn fresh_record(source: &str, target: &str, translated: &str) -> TranslationRecord {
    TranslationRecord::new(source, "en", target, translated)
}

fn stale_record(source: &str, target: &str, translated: &str) -> TranslationRecord {
    let mut record = fresh_record(source, target, translated);
    // One hour past the freshness window
    record.timestamp_ms = chrono::Utc::now().timestamp_millis() - CACHE_MAX_AGE_MS - 3_600_000;
    record
}

fn make_repo(
    behavior: MockTranslateBehavior,
) -> (TranslationRepository<MockTranslateApi>, TranslationStore) {
    let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");
    let store = TranslationStore::new(db);
    let repo = TranslationRepository::new(MockTranslateApi::new(behavior), store.clone());
    (repo, store)
}

#[tokio::test]
async fn test_translateOne_withFreshCacheHit_shouldNotInvokeNetwork() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let store = TranslationStore::new(db);
    store.put(&fresh_record("hello", "fr", "bonjour")).await.unwrap();

    let client = MockTranslateApi::working();
    let counters = client.clone_counters();
    let repo = TranslationRepository::new(client, store);

    let result = repo.translate_one("hello", "fr", None).await.unwrap();
    assert_eq!(result.translated_text, "bonjour");

    // Repeated lookups stay cached
    let result = repo.translate_one("hello", "fr", None).await.unwrap();
    assert_eq!(result.translated_text, "bonjour");

    assert_eq!(counters.single_calls(), 0);
    assert_eq!(counters.batch_calls(), 0);
}

#[tokio::test]
async fn test_translateOne_withStaleEntry_shouldInvokeNetworkOnceAndOverwrite() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let store = TranslationStore::new(db);
    store.put(&stale_record("hello", "fr", "bonjour")).await.unwrap();

    let client = MockTranslateApi::working();
    let counters = client.clone_counters();
    let repo = TranslationRepository::new(client, store.clone());

    let result = repo.translate_one("hello", "fr", None).await.unwrap();
    assert_eq!(result.translated_text, "[fr] hello");
    assert_eq!(counters.single_calls(), 1);

    // The cache entry was overwritten by the fresh result
    let cached = store.get("hello", "fr").await.unwrap().unwrap();
    assert_eq!(cached.translated_text, "[fr] hello");
    assert!(cached.is_fresh_at(chrono::Utc::now().timestamp_millis(), CACHE_MAX_AGE_MS));
}

#[tokio::test]
async fn test_translateOne_withCacheMiss_shouldWriteThrough() {
    let (repo, store) = make_repo(MockTranslateBehavior::Working);

    let result = repo.translate_one("goodbye", "de", None).await.unwrap();
    assert_eq!(result.translated_text, "[de] goodbye");

    let cached = store.get("goodbye", "de").await.unwrap().unwrap();
    assert_eq!(cached.translated_text, "[de] goodbye");
}

#[tokio::test]
async fn test_translateOne_withStaleEntryAndNetworkFailure_shouldNotFallBackToStaleData() {
    let (repo, store) = make_repo(MockTranslateBehavior::RateLimited);
    store.put(&stale_record("hello", "fr", "bonjour")).await.unwrap();

    let result = repo.translate_one("hello", "fr", None).await;

    match result {
        Err(AppError::Translation(TranslationError::RateLimited { attempts })) => {
            assert_eq!(attempts, 5);
        }
        other => panic!("Expected RateLimited failure, got {:?}", other.map(|r| r.translated_text)),
    }

    // The stale entry is left untouched
    let cached = store.get("hello", "fr").await.unwrap().unwrap();
    assert_eq!(cached.translated_text, "bonjour");
}

#[tokio::test]
async fn test_translateMany_withPartialCacheHits_shouldBatchOnlyMisses() {
    let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");
    let store = TranslationStore::new(db);
    let client = MockTranslateApi::working();
    store.put(&fresh_record("one", "fr", "un")).await.unwrap();
    store.put(&fresh_record("two", "fr", "deux")).await.unwrap();

    let repo = TranslationRepository::new(client, store.clone());

    let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];
    let results = repo.translate_many(&texts, "fr", None).await.unwrap();

    assert_eq!(results.len(), 3);

    // The new result was written through
    let cached = store.get("three", "fr").await.unwrap().unwrap();
    assert_eq!(cached.translated_text, "[fr] three");
}

#[tokio::test]
async fn test_translateMany_withPartialCacheHits_shouldIssueExactlyOneClientCall() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let store = TranslationStore::new(db);
    store.put(&fresh_record("one", "fr", "un")).await.unwrap();
    store.put(&fresh_record("two", "fr", "deux")).await.unwrap();

    let client = MockTranslateApi::working();
    let counters = client.clone_counters();
    let repo = TranslationRepository::new(client, store);

    let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];
    let results = repo.translate_many(&texts, "fr", None).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(counters.batch_calls(), 1);
    assert_eq!(counters.single_calls(), 1);
    assert_eq!(counters.last_batch(), vec!["three".to_string()]);
}

#[tokio::test]
async fn test_translateMany_withAllCacheHits_shouldNotInvokeNetwork() {
    let db = DatabaseConnection::new_in_memory().unwrap();
    let store = TranslationStore::new(db);
    store.put(&fresh_record("one", "fr", "un")).await.unwrap();
    store.put(&fresh_record("two", "fr", "deux")).await.unwrap();

    let client = MockTranslateApi::working();
    let counters = client.clone_counters();
    let repo = TranslationRepository::new(client, store);

    let texts = vec!["one".to_string(), "two".to_string()];
    let results = repo.translate_many(&texts, "fr", None).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(counters.batch_calls(), 0);
    assert_eq!(counters.single_calls(), 0);
}

#[tokio::test]
async fn test_translateMany_withBatchFailure_shouldFailWholeCall() {
    let (repo, store) = make_repo(MockTranslateBehavior::Transport);
    store.put(&fresh_record("one", "fr", "un")).await.unwrap();

    let texts = vec!["one".to_string(), "two".to_string()];
    let result = repo.translate_many(&texts, "fr", None).await;

    assert!(matches!(
        result,
        Err(AppError::Translation(TranslationError::TransportError(_)))
    ));

    // The missing text was never cached
    assert!(store.get("two", "fr").await.unwrap().is_none());
}

#[tokio::test]
async fn test_translateMany_withEmptyInput_shouldReturnEmptyWithoutNetwork() {
    let client = MockTranslateApi::working();
    let counters = client.clone_counters();
    let db = DatabaseConnection::new_in_memory().unwrap();
    let repo = TranslationRepository::new(client, TranslationStore::new(db));

    let results = repo.translate_many(&[], "fr", None).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(counters.single_calls(), 0);
}
