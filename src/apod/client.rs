/*!
 * HTTP client for the remote content endpoint.
 *
 * Fetches daily items by date, date range, or random count. Unlike the
 * translation endpoint this one is authenticated with an API key and has
 * a stable JSON contract, so no retry logic lives here - the sync
 * scheduler owns retries for this path.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::database::models::{ApodRecord, MediaKind};
use crate::errors::ContentError;

/// Default content endpoint base URL
pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov";

/// Request timeout for content fetches
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Wire representation of a daily item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApodDto {
    /// Date key, `YYYY-MM-DD`
    pub date: String,
    /// Item title
    pub title: String,
    /// Long-form description
    pub explanation: String,
    /// Primary media URL
    pub url: String,
    /// Media type string ("image" or "video")
    pub media_type: String,
    /// Thumbnail URL for videos
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Attribution string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// High-resolution media URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    /// Endpoint service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,
}

impl From<ApodDto> for ApodRecord {
    fn from(dto: ApodDto) -> Self {
        ApodRecord {
            date: dto.date,
            title: dto.title,
            explanation: dto.explanation,
            url: dto.url,
            media_type: dto.media_type.parse().unwrap_or(MediaKind::Image),
            thumbnail_url: dto.thumbnail_url,
            copyright: dto.copyright.map(|c| c.trim().to_string()),
            hd_url: dto.hdurl,
            is_favorite: false,
        }
    }
}

/// Interface to the content endpoint.
///
/// The API key is passed per call because a custom key override can be
/// configured at runtime.
#[async_trait]
pub trait ApodFetch: Send + Sync {
    /// Fetch the item for a single date
    async fn fetch(&self, api_key: &str, date: &str) -> Result<ApodRecord, ContentError>;

    /// Fetch all items in an inclusive date range
    async fn fetch_range(
        &self,
        api_key: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ApodRecord>, ContentError>;

    /// Fetch a number of random items
    async fn fetch_count(&self, api_key: &str, count: u32) -> Result<Vec<ApodRecord>, ContentError>;
}

/// Client for the production content endpoint
pub struct NasaClient {
    /// HTTP client for making requests
    client: Client,
    /// Endpoint base URL, overridable for tests
    base_url: String,
}

impl Default for NasaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NasaClient {
    /// Create a new client against the production endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/planetary/apod", self.base_url)
    }

    /// Issue a GET and decode the body as `T`
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
    ) -> Result<T, ContentError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(query)
            .send()
            .await
            .map_err(|e| ContentError::TransportError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ContentError::HttpError {
                code: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|_| ContentError::EmptyResponse)
    }
}

#[async_trait]
impl ApodFetch for NasaClient {
    async fn fetch(&self, api_key: &str, date: &str) -> Result<ApodRecord, ContentError> {
        debug!("Fetching content item for {}", date);

        let dto: ApodDto = self
            .get_json(&[("api_key", api_key), ("date", date), ("thumbs", "true")])
            .await?;

        Ok(dto.into())
    }

    async fn fetch_range(
        &self,
        api_key: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ApodRecord>, ContentError> {
        debug!("Fetching content items from {} to {}", start_date, end_date);

        let dtos: Vec<ApodDto> = self
            .get_json(&[
                ("api_key", api_key),
                ("start_date", start_date),
                ("end_date", end_date),
                ("thumbs", "true"),
            ])
            .await?;

        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn fetch_count(&self, api_key: &str, count: u32) -> Result<Vec<ApodRecord>, ContentError> {
        debug!("Fetching {} random content items", count);

        let count = count.to_string();
        let dtos: Vec<ApodDto> = self
            .get_json(&[
                ("api_key", api_key),
                ("count", count.as_str()),
                ("thumbs", "true"),
            ])
            .await?;

        Ok(dtos.into_iter().map(Into::into).collect())
    }
}
