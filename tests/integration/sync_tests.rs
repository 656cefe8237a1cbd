/*!
 * Integration tests for the sync worker and scheduler
 */

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use astropod::apod::ApodRepository;
use astropod::database::{ContentStore, DatabaseConnection, SyncStateStore};
use astropod::date_utils;
use astropod::preferences::Preferences;
use astropod::sync::{SyncScheduler, SyncWorker, TickOutcome};

use crate::common::{
    make_item, FixedConnectivity, MockApodFetch, RecordedNotification, RecordingNotifier,
};

struct SyncFixture {
    _dir: TempDir,
    client: MockApodFetch,
    preferences: Arc<Preferences>,
    notifier: Arc<RecordingNotifier>,
    worker: SyncWorker<MockApodFetch>,
    db: DatabaseConnection,
}

fn fixture(client: MockApodFetch) -> SyncFixture {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let preferences = Arc::new(
        Preferences::load(dir.path().join("prefs.json")).expect("Failed to load preferences"),
    );
    let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");
    let repository = Arc::new(ApodRepository::new(
        client.clone(),
        ContentStore::new(db.clone()),
        preferences.clone(),
    ));
    let notifier = Arc::new(RecordingNotifier::new());

    let worker = SyncWorker::new(repository, preferences.clone(), notifier.clone());

    SyncFixture {
        _dir: dir,
        client,
        preferences,
        notifier,
        worker,
        db,
    }
}

#[tokio::test]
async fn test_runOnce_shouldNotifyAndRefreshHistory() {
    let fx = fixture(MockApodFetch::new());

    fx.worker.run_once().await.expect("Sync run failed");

    assert_eq!(fx.notifier.new_item_count(), 1);
    assert_eq!(fx.client.fetch_calls(), 1);
    // The trailing week was refreshed independently
    assert_eq!(fx.client.range_calls(), 1);
}

#[tokio::test]
async fn test_runOnce_withMatchingKeyword_shouldNotifyFirstMatchOnly() {
    let today = date_utils::today_key();
    let mut item = make_item(&today);
    item.title = "A Galaxy Beside a Nebula".to_string();

    let fx = fixture(MockApodFetch::new().with_item(item));
    fx.preferences.add_watched_keyword("nebula").unwrap();
    fx.preferences.add_watched_keyword("galaxy").unwrap();

    fx.worker.run_once().await.expect("Sync run failed");

    // Both keywords match, but only the first (set order) is notified
    assert_eq!(fx.notifier.keyword_matches(), vec!["galaxy".to_string()]);
}

#[tokio::test]
async fn test_runOnce_withNonMatchingKeyword_shouldNotNotifyKeyword() {
    let fx = fixture(MockApodFetch::new());
    fx.preferences.add_watched_keyword("supernova").unwrap();

    fx.worker.run_once().await.expect("Sync run failed");

    assert_eq!(fx.notifier.new_item_count(), 1);
    assert!(fx.notifier.keyword_matches().is_empty());
}

#[tokio::test]
async fn test_runOnce_withNotificationsDisabled_shouldStillRefreshHistory() {
    let fx = fixture(MockApodFetch::new());
    fx.preferences.set_notifications_enabled(false).unwrap();
    fx.preferences.add_watched_keyword("item").unwrap();

    fx.worker.run_once().await.expect("Sync run failed");

    assert!(fx.notifier.all().is_empty());
    // History refresh is independent of the notification outcome
    assert_eq!(fx.client.range_calls(), 1);
}

#[tokio::test]
async fn test_runOnce_withNetworkFailure_shouldFail() {
    let fx = fixture(MockApodFetch::new());
    fx.client.fail_all();

    let result = fx.worker.run_once().await;

    assert!(result.is_err());
    assert!(fx.notifier.all().is_empty());
}

#[tokio::test]
async fn test_tick_withNoPreviousRun_shouldRunAndRecordTimestamp() {
    let fx = fixture(MockApodFetch::new());
    let state = SyncStateStore::new(fx.db.clone());
    let scheduler = SyncScheduler::new(
        fx.worker,
        state.clone(),
        Arc::new(FixedConnectivity::online()),
    );

    let outcome = scheduler.tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::Ran);
    assert!(state.last_run_ms().await.unwrap().is_some());
}

#[tokio::test]
async fn test_tick_withRecentRun_shouldNotBeDue() {
    let fx = fixture(MockApodFetch::new());
    let state = SyncStateStore::new(fx.db.clone());
    state
        .set_last_run_ms(chrono::Utc::now().timestamp_millis())
        .await
        .unwrap();

    let scheduler = SyncScheduler::new(
        fx.worker,
        state,
        Arc::new(FixedConnectivity::online()),
    );

    let outcome = scheduler.tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::NotDue);
    assert_eq!(fx.client.fetch_calls(), 0);
}

#[tokio::test]
async fn test_tick_withElapsedPeriod_shouldRunAgain() {
    let fx = fixture(MockApodFetch::new());
    let state = SyncStateStore::new(fx.db.clone());
    // Last run 10 seconds ago against a 5 second period
    state
        .set_last_run_ms(chrono::Utc::now().timestamp_millis() - 10_000)
        .await
        .unwrap();

    let scheduler = SyncScheduler::new(
        fx.worker,
        state,
        Arc::new(FixedConnectivity::online()),
    )
    .with_timing(Duration::from_secs(5), Duration::from_millis(10));

    let outcome = scheduler.tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::Ran);
    assert_eq!(fx.client.fetch_calls(), 1);
}

#[tokio::test]
async fn test_tick_whileOffline_shouldSkipWithoutFetching() {
    let fx = fixture(MockApodFetch::new());
    let state = SyncStateStore::new(fx.db.clone());
    let scheduler = SyncScheduler::new(
        fx.worker,
        state.clone(),
        Arc::new(FixedConnectivity::offline()),
    );

    let outcome = scheduler.tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::Offline);
    assert_eq!(fx.client.fetch_calls(), 0);
    assert!(state.last_run_ms().await.unwrap().is_none());
}

#[tokio::test]
async fn test_tick_withFailingRun_shouldNotAdvanceLastRun() {
    let fx = fixture(MockApodFetch::new());
    fx.client.fail_all();
    let state = SyncStateStore::new(fx.db.clone());
    let scheduler = SyncScheduler::new(
        fx.worker,
        state.clone(),
        Arc::new(FixedConnectivity::online()),
    );

    let outcome = scheduler.tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::Failed);
    assert!(state.last_run_ms().await.unwrap().is_none());
}

#[tokio::test]
async fn test_notifications_shouldCarryTodaysDate() {
    let fx = fixture(MockApodFetch::new());

    fx.worker.run_once().await.expect("Sync run failed");

    let today = date_utils::today_key();
    assert_eq!(
        fx.notifier.all()[0],
        RecordedNotification::NewItem { date: today }
    );
}
