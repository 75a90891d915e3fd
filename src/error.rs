//! Error types for wikiharvest
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for wikiharvest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors (retried only inside the Request Executor)
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("API error '{code}': {info}")]
    Api { code: String, info: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Unexpected response shape: {message}")]
    Decode { message: String },

    // ============================================================================
    // Aggregation Errors
    // ============================================================================
    #[error("Pagination did not terminate ({reason}) after {pages} pages")]
    PaginationExhausted { reason: String, pages: u32 },

    #[error("Redirect resolution failed for '{title}': {message}")]
    Resolution { title: String, message: String },

    #[error("Category walk failed at '{path}': {source}")]
    CategoryWalk { path: String, source: Box<Error> },
}

impl Error {
    /// Create an API error from a MediaWiki error payload
    pub fn api(code: impl Into<String>, info: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            info: info.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a pagination exhaustion error
    pub fn pagination_exhausted(reason: impl Into<String>, pages: u32) -> Self {
        Self::PaginationExhausted {
            reason: reason.into(),
            pages,
        }
    }

    /// Create a resolution error
    pub fn resolution(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Wrap an error with the category path at which it occurred
    pub fn category_walk(path: impl Into<String>, source: Error) -> Self {
        Self::CategoryWalk {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Check if this error is retryable at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for wikiharvest
pub type Result<T> = std::result::Result<T, Error>;
