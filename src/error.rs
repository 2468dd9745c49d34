//! Error types for catalog-image-export
//!
//! Two layers of failure exist:
//! - Per-identifier failures ([`FetchError`]) are recovered inside the catalog
//!   client. They are logged and turned into an absent record, so a single bad
//!   identifier never aborts a batch.
//! - Whole-run failures ([`Error`]) abort the run and are surfaced to the caller,
//!   mapped to HTTP status codes through [`ToHttpStatus`] when served over the API.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for catalog-image-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for catalog-image-export
///
/// Client-side problems (empty batch, bad input, bad configuration) are kept
/// apart from system failures so callers can tell user error from server error.
#[derive(Debug, Error)]
pub enum Error {
    /// No identifiers remained after trimming and discarding blank entries
    #[error("no identifiers provided")]
    EmptyBatch,

    /// Batch input could not be read or parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "catalog.base_url")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization or parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Network error outside of a per-identifier fetch (e.g. client construction)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Internal invariant broken (e.g. a batch that does not match its input table)
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a configuration error for a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Whether the failure was caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Failure of a single catalog lookup
///
/// Never propagated past the catalog client: the identifier's record becomes
/// absent and the batch continues.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Could not connect to the catalog host
    #[error("connection failed: {0}")]
    Connect(String),

    /// The catalog answered with a non-2xx status
    #[error("unexpected HTTP status {status}")]
    Status {
        /// HTTP status code returned by the catalog
        status: u16,
    },

    /// The request failed or the body could not be read
    #[error("request failed: {0}")]
    Body(String),

    /// The body was not valid JSON
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The lookup URL could not be built from the base URL and identifier
    #[error("invalid lookup URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status {
                status: status.as_u16(),
            }
        } else {
            FetchError::Body(e.to_string())
        }
    }
}

/// API error response format
///
/// Returned by API endpoints when a batch cannot be processed.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "empty_batch",
///     "message": "no identifiers provided"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "empty_batch", "invalid_input")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        let mut api_error = Self::new(code, message);
        api_error.error.details = Some(details);
        api_error
    }

    /// Create a "missing_file" error for a multipart field that was not sent
    pub fn missing_file(field: &str) -> Self {
        Self::with_details(
            "missing_file",
            format!("No identifier file provided in '{field}' field"),
            serde_json::json!({ "field": field }),
        )
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - caller supplied nothing usable
            Error::EmptyBatch => 400,
            Error::InvalidInput(_) => 400,
            Error::Config { .. } => 400,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::Csv(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,

            // 502 Bad Gateway - catalog side
            Error::Network(_) => 502,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::EmptyBatch => "empty_batch",
            Error::InvalidInput(_) => "invalid_input",
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::Csv(_) => "csv_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
