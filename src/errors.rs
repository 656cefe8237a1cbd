/*!
 * Error types for the astropod application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the translation endpoint
#[derive(Error, Debug)]
pub enum TranslationError {
    /// All retry attempts ended in HTTP 429
    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimited {
        /// Number of attempts made before giving up
        attempts: u32,
    },

    /// Terminal HTTP status (non-2xx, non-429)
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Network-level failure (timeout, DNS, connection reset) with retries exhausted
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Caller passed empty or all-whitespace text
    #[error("Cannot translate empty text")]
    EmptyInput,

    /// Caller passed a language code that is neither ISO 639-1 nor "auto"
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),
}

/// Errors that can occur when talking to the content endpoint
#[derive(Error, Debug)]
pub enum ContentError {
    /// 2xx response with a missing or undecodable body
    #[error("Empty response from content endpoint")]
    EmptyResponse,

    /// Non-2xx status from the content endpoint
    #[error("HTTP error: {code} - {message}")]
    HttpError {
        /// HTTP status code
        code: u16,
        /// Error body or status text
        message: String,
    },

    /// Network-level failure
    #[error("Transport error: {0}")]
    TransportError(String),

    /// No record for the requested date, locally or remotely
    #[error("No item found for date: {0}")]
    NotFound(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the translation pipeline
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the content pipeline
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Error from local persistence
    #[error("Storage error: {0}")]
    Storage(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl TranslationError {
    /// Whether the error looks like a connectivity problem rather than a
    /// server-side rejection. Callers use this to pick an offline message
    /// over a generic one.
    pub fn is_network_related(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }
}
