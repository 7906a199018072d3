//! Error types for the unified provider surface
//!
//! A single crate-wide error enum so callers can branch on kind rather than
//! message text. Configuration problems, vendor rejections, polling outcomes
//! and cancellation are distinct variants.

use thiserror::Error;

/// Errors produced by providers and the shared runtime primitives.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Invalid or missing configuration, detected before any network call
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// No API key could be resolved for a provider
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// Vendor returned a non-success HTTP status
    #[error("API error {status}: {message}")]
    ApiError {
        /// HTTP status code returned by the vendor
        status: u16,
        /// Vendor error body (verbatim, possibly JSON)
        message: String,
    },

    /// Transport-level HTTP failure (connect, send, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Malformed vendor JSON or an unexpected response shape
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failure while consuming a streaming response body
    #[error("Stream error: {0}")]
    StreamError(String),

    /// The capability or option is not supported by this provider
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A caller-supplied parameter is invalid for this provider/model
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A long-running task did not reach a terminal state within the timeout
    #[error("Polling timed out after {elapsed_ms}ms (last status: {last_status})")]
    PollingTimeout {
        /// Wall-clock milliseconds spent polling
        elapsed_ms: u64,
        /// Last non-terminal status observed, for diagnostics
        last_status: String,
    },

    /// A long-running task did not reach a terminal state within the attempt budget
    #[error("Polling exhausted after {attempts} attempts")]
    PollingExhausted {
        /// Number of poll invocations performed
        attempts: u32,
    },

    /// The caller cancelled the operation
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Invariant violation inside this crate
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ProviderError {
    /// Build an `ApiError` from a status code and the raw error body.
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Whether this error was caused by caller-side cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        Self::HttpError(e.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ProviderError>;
