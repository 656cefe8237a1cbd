/*!
 * Periodic sync scheduling.
 *
 * A cross-platform stand-in for a platform job scheduler: a timer loop
 * with a persisted last-run timestamp (so the daily cadence survives
 * restarts), a connectivity constraint checked before each run, and a
 * doubling retry backoff applied when a run fails.
 */

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::apod::client::ApodFetch;
use crate::database::sync_state::SyncStateStore;
use anyhow::Result;

use super::connectivity::Connectivity;
use super::worker::SyncWorker;

/// Default run period: once a day
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// How often the loop re-evaluates whether a run is due
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Retry backoff after a failed run: 30 min start, doubling to a 6 h cap
const RETRY_BACKOFF_START: Duration = Duration::from_secs(30 * 60);
const RETRY_BACKOFF_CAP: Duration = Duration::from_secs(6 * 60 * 60);

/// Outcome of one scheduler evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The period since the last successful run has not elapsed
    NotDue,
    /// A run was due but the connectivity constraint was unmet
    Offline,
    /// A run completed and the last-run timestamp was advanced
    Ran,
    /// A run was attempted and failed; the caller should back off
    Failed,
}

/// Doubling retry backoff state
#[derive(Debug, Clone, Copy)]
struct RetryBackoff {
    current: Duration,
}

impl RetryBackoff {
    fn new() -> Self {
        Self {
            current: RETRY_BACKOFF_START,
        }
    }

    /// Current delay, advancing the state for the next failure
    fn advance(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(RETRY_BACKOFF_CAP);
        delay
    }

    fn reset(&mut self) {
        self.current = RETRY_BACKOFF_START;
    }
}

/// Periodic scheduler around a [`SyncWorker`]
pub struct SyncScheduler<F: ApodFetch> {
    /// Worker executing each run
    worker: SyncWorker<F>,
    /// Persisted last-run bookkeeping
    state: SyncStateStore,
    /// Connectivity constraint
    connectivity: Arc<dyn Connectivity>,
    /// Wall-clock period between runs
    period: Duration,
    /// Loop wake-up interval
    poll_interval: Duration,
}

impl<F: ApodFetch> SyncScheduler<F> {
    /// Create a scheduler with the default daily cadence
    pub fn new(
        worker: SyncWorker<F>,
        state: SyncStateStore,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            worker,
            state,
            connectivity,
            period: DEFAULT_PERIOD,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the run period and poll interval
    pub fn with_timing(mut self, period: Duration, poll_interval: Duration) -> Self {
        self.period = period;
        self.poll_interval = poll_interval;
        self
    }

    /// Evaluate once: run the worker if a run is due and the network is up
    pub async fn tick(&self) -> Result<TickOutcome> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let last_run_ms = self.state.last_run_ms().await?;

        let due = match last_run_ms {
            Some(last) => now_ms - last >= self.period.as_millis() as i64,
            None => true,
        };

        if !due {
            return Ok(TickOutcome::NotDue);
        }

        if !self.connectivity.is_online().await {
            debug!("Sync due but offline, will re-check later");
            return Ok(TickOutcome::Offline);
        }

        match self.worker.run_once().await {
            Ok(()) => {
                self.state.set_last_run_ms(now_ms).await?;
                Ok(TickOutcome::Ran)
            }
            Err(e) => {
                warn!("Sync run failed: {}", e);
                Ok(TickOutcome::Failed)
            }
        }
    }

    /// Run the scheduling loop until the shutdown channel flips to true
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            "Sync scheduler started (period {:?}, poll every {:?})",
            self.period, self.poll_interval
        );

        let mut backoff = RetryBackoff::new();

        loop {
            let sleep_for = match self.tick().await {
                Ok(TickOutcome::Failed) => backoff.advance(),
                Ok(outcome) => {
                    if outcome == TickOutcome::Ran {
                        backoff.reset();
                    }
                    self.poll_interval
                }
                Err(e) => {
                    warn!("Scheduler bookkeeping error: {}", e);
                    backoff.advance()
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {}
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Sync scheduler stopped");
        Ok(())
    }
}
