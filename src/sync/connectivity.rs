/*!
 * Connectivity constraint for the sync scheduler.
 *
 * The scheduler declares a network requirement rather than letting the
 * worker fail on a dead link: before each due run the probe is consulted,
 * and an offline verdict skips the run until the next check.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Probe timeout; connectivity checks should be fast
const PROBE_TIMEOUT_SECS: u64 = 5;

/// Connectivity verdict provider
#[async_trait]
pub trait Connectivity: Send + Sync {
    /// Whether the network constraint is currently satisfied
    async fn is_online(&self) -> bool;
}

/// Probe that issues a HEAD request against a known-good URL
pub struct HttpProbe {
    /// HTTP client for making requests
    client: Client,
    /// URL to probe
    url: String,
}

impl HttpProbe {
    /// Create a probe against the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Connectivity for HttpProbe {
    async fn is_online(&self) -> bool {
        // Any response at all means the link is up; HTTP-level errors are
        // the worker's problem, not a connectivity failure
        match self.client.head(&self.url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!("Connectivity probe failed: {}", e);
                false
            }
        }
    }
}
