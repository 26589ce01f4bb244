//! Transport error types.
//!
//! The request builder never fails; every error below surfaces only when a
//! finalized request is executed:
//!
//! - [`HttpResponseError`]: non-2xx HTTP responses from the platform
//! - [`MaxHttpRetriesExceededError`]: retry attempts exhausted
//! - [`InvalidHttpRequestError`]: a descriptor failed validation before sending
//! - [`HttpError`]: unified error type encompassing all of the above and
//!   network faults
//!
//! # Example
//!
//! ```rust,ignore
//! use iot_platform_api::clients::{HttpError, Transport};
//!
//! match client.execute(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::MaxRetries(e)) => println!("Retries exhausted after {} tries", e.tries),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// The message is taken from the platform's JSON error body
/// (`{"error": "...", "message": "...", "info": "..."}`) when present.
#[derive(Debug, Error)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
    /// Reference for error reporting (the platform's `error` code or request id).
    pub error_reference: Option<String>,
}

/// Error returned when maximum retry attempts have been exhausted.
///
/// Raised when a request keeps failing with 429 or a retryable 5xx after all
/// configured attempts have been made.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Error message from the last response.
    pub message: String,
    /// Reference for error reporting.
    pub error_reference: Option<String>,
}

/// Error returned when a request descriptor fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A byte body was provided without a content type.
    #[error("Cannot send a binary body without a content type.")]
    MissingContentType,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request asked for zero attempts.
    #[error("A request must be attempted at least once.")]
    InvalidTries,

    /// A header name or value cannot be encoded.
    #[error("Invalid header {name}.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },
}

/// Unified error type for all transport errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code, if the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }
}
