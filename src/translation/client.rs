/*!
 * HTTP client for the unauthenticated translation endpoint.
 *
 * The endpoint requires no API key but blocks programmatic-looking
 * clients, so requests carry a fixed desktop-browser user agent and the
 * matching accept headers. Rate limiting (HTTP 429) and transport errors
 * are retried with exponential backoff and jitter; any other non-2xx
 * status is terminal.
 */

use async_trait::async_trait;
use log::{debug, warn};
use rand::Rng;
use reqwest::Client;
use std::time::Duration;

use crate::database::models::TranslationRecord;
use crate::errors::TranslationError;
use crate::language_utils;

use super::parser::parse_translation;

/// Translation endpoint URL
const BASE_URL: &str = "https://clients5.google.com/translate_a/t";

/// Client identifier query parameter expected by the endpoint
const CLIENT_ID: &str = "dict-chrome-ex";

/// Desktop browser user agent; the endpoint rejects obvious bots
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Total attempts before giving up (first try included)
const MAX_ATTEMPTS: u32 = 5;

/// Backoff schedule: 2 s start, x1.5 per attempt, 60 s cap, +/-25% jitter
const INITIAL_BACKOFF_MS: u64 = 2_000;
const BACKOFF_MULTIPLIER: f64 = 1.5;
const MAX_BACKOFF_MS: u64 = 60_000;

/// Pause between items in a batch, to stay under the rate limit
const BATCH_DELAY_MS: u64 = 3_000;

/// Per-attempt connect and read timeout
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Interface to the translation endpoint.
///
/// The repository talks to this trait so tests can substitute a mock and
/// count network invocations.
#[async_trait]
pub trait TranslateApi: Send + Sync {
    /// Translate a single text
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<TranslationRecord, TranslationError>;

    /// Translate a list of texts sequentially; the first failure aborts
    /// the batch with no partial results
    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationRecord>, TranslationError>;
}

/// Client for the unauthenticated translation endpoint
pub struct TranslateClient {
    /// HTTP client for making requests
    client: Client,
    /// Endpoint URL, overridable for tests
    base_url: String,
    /// Maximum number of attempts, first try included
    max_attempts: u32,
    /// Base backoff time in milliseconds before the first retry
    initial_backoff_ms: u64,
    /// Pause between batch items in milliseconds
    batch_delay_ms: u64,
}

impl Default for TranslateClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslateClient {
    /// Create a new client against the production endpoint
    pub fn new() -> Self {
        Self::with_config(BASE_URL, MAX_ATTEMPTS, INITIAL_BACKOFF_MS, BATCH_DELAY_MS)
    }

    /// Create a client with a custom endpoint and retry timing
    pub fn with_config(
        base_url: impl Into<String>,
        max_attempts: u32,
        initial_backoff_ms: u64,
        batch_delay_ms: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            max_attempts: max_attempts.max(1),
            initial_backoff_ms,
            batch_delay_ms,
        }
    }

    /// Validate inputs before any network activity
    fn validate(
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<(), TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyInput);
        }
        if !language_utils::is_valid_code(target_language) {
            return Err(TranslationError::InvalidLanguage(
                target_language.to_string(),
            ));
        }
        if let Some(source) = source_language {
            if !language_utils::is_valid_source_code(source) {
                return Err(TranslationError::InvalidLanguage(source.to_string()));
            }
        }
        Ok(())
    }

    /// Full backoff delay before `attempt`, with multiplicative +/-25%
    /// jitter applied after the cap
    fn backoff_delay_ms(&self, attempt: u32) -> u64 {
        let base = base_backoff_ms(self.initial_backoff_ms, attempt) as f64;
        let jitter: f64 = rand::rng().random_range(0.75..=1.25);
        (base * jitter) as u64
    }
}

/// Deterministic part of the backoff schedule: the delay base before
/// attempt `attempt` (1-based, so the first delayed attempt is 2).
pub(crate) fn base_backoff_ms(initial_backoff_ms: u64, attempt: u32) -> u64 {
    debug_assert!(attempt >= 2);
    let exp = (attempt - 2) as i32;
    let raw = initial_backoff_ms as f64 * BACKOFF_MULTIPLIER.powi(exp);
    (raw as u64).min(MAX_BACKOFF_MS)
}

#[async_trait]
impl TranslateApi for TranslateClient {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<TranslationRecord, TranslationError> {
        Self::validate(text, target_language, source_language)?;

        let source = language_utils::normalize_source(source_language);
        let target = target_language.to_lowercase();

        let mut attempt = 0u32;
        let mut saw_429 = false;
        let mut last_transport_error = String::new();

        while attempt < self.max_attempts {
            attempt += 1;

            let response_result = self
                .client
                .get(&self.base_url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .header(reqwest::header::ACCEPT, ACCEPT)
                .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
                .query(&[
                    ("client", CLIENT_ID),
                    ("sl", source.as_str()),
                    ("tl", target.as_str()),
                    ("q", text),
                ])
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        match response.text().await {
                            Ok(payload) => {
                                let (translated, outcome) = parse_translation(&payload, text);
                                if outcome.is_fallback() {
                                    // Degraded but still a success; the caller gets
                                    // best-effort text either way
                                    warn!(
                                        "Unrecognized translation payload shape, used fallback ({:?})",
                                        outcome
                                    );
                                }
                                return Ok(TranslationRecord::new(
                                    text,
                                    source.clone(),
                                    target.clone(),
                                    translated,
                                ));
                            }
                            Err(e) => {
                                saw_429 = false;
                                last_transport_error =
                                    format!("Failed to read response body: {}", e);
                                warn!(
                                    "{} - attempt {}/{}",
                                    last_transport_error, attempt, self.max_attempts
                                );
                            }
                        }
                    } else if status.as_u16() == 429 {
                        saw_429 = true;
                        warn!(
                            "Translation endpoint rate limited (429) - attempt {}/{}",
                            attempt, self.max_attempts
                        );
                    } else {
                        // Terminal status, no retry
                        return Err(TranslationError::HttpError(status.as_u16()));
                    }
                }
                Err(e) => {
                    saw_429 = false;
                    last_transport_error = e.to_string();
                    warn!(
                        "Translation request failed: {} - attempt {}/{}",
                        last_transport_error, attempt, self.max_attempts
                    );
                }
            }

            if attempt < self.max_attempts {
                let delay = self.backoff_delay_ms(attempt + 1);
                debug!("Waiting {} ms before retrying translation", delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        if saw_429 {
            Err(TranslationError::RateLimited {
                attempts: self.max_attempts,
            })
        } else {
            Err(TranslationError::TransportError(last_transport_error))
        }
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationRecord>, TranslationError> {
        let mut results = Vec::with_capacity(texts.len());

        for (index, text) in texts.iter().enumerate() {
            if index > 0 {
                debug!(
                    "Waiting {} ms between batch translation requests",
                    self.batch_delay_ms
                );
                tokio::time::sleep(Duration::from_millis(self.batch_delay_ms)).await;
            }

            // No partial batch results: the first failure aborts everything
            let record = self.translate(text, target_language, source_language).await?;
            results.push(record);
        }

        Ok(results)
    }
}
