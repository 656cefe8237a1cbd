/*!
 * Periodic background sync: worker, scheduler, and connectivity probe.
 */

// Re-export main types for easier usage
pub use self::connectivity::{Connectivity, HttpProbe};
pub use self::scheduler::{SyncScheduler, TickOutcome, DEFAULT_PERIOD};
pub use self::worker::SyncWorker;

// Submodules
pub mod connectivity;
pub mod scheduler;
pub mod worker;
