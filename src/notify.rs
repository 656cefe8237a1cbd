/*!
 * Notification seam for the sync job.
 *
 * The sync worker emits two distinct notification kinds through this
 * trait: a general "new item" notice and a keyword-match notice. The
 * default implementation writes to the log; tests substitute a recorder.
 */

use log::info;

use crate::database::models::ApodRecord;

/// Channel name for general new-item notifications
pub const CHANNEL_APOD: &str = "apod";

/// Channel name for keyword-match notifications
pub const CHANNEL_KEYWORD: &str = "keyword";

/// Sink for sync notifications
pub trait Notifier: Send + Sync {
    /// A new daily item arrived
    fn new_item(&self, item: &ApodRecord);

    /// A watched keyword matched the new item
    fn keyword_match(&self, item: &ApodRecord, keyword: &str);
}

/// Notifier that writes through the log facade
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn new_item(&self, item: &ApodRecord) {
        info!("[{}] New item for {}: {}", CHANNEL_APOD, item.date, item.title);
    }

    fn keyword_match(&self, item: &ApodRecord, keyword: &str) {
        info!(
            "[{}] Watched keyword '{}' matched item for {}: {}",
            CHANNEL_KEYWORD, keyword, item.date, item.title
        );
    }
}
