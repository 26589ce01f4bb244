//! Errors surfaced to endpoint callers.
//!
//! The taxonomy is intentionally thin: transport failures pass through
//! unchanged as [`RestError::Http`], and the only additions are the two
//! serialization boundaries this layer owns (encoding the request payload,
//! decoding the response body).
//!
//! # Example
//!
//! ```rust,ignore
//! use iot_platform_api::rest::RestError;
//!
//! match client.execute::<Alarm>(request).await {
//!     Ok(alarm) => println!("Alarm {}", alarm.id),
//!     Err(e) if e.is_not_found() => println!("No such alarm"),
//!     Err(RestError::Decode { code, source }) => println!("Bad body ({code}): {source}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::HttpError;
use crate::rest::sanitize::PayloadError;

/// Error type for typed request execution.
#[derive(Debug, Error)]
pub enum RestError {
    /// The transport failed or the platform returned a non-2xx status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The request payload could not be encoded.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// A successful response body did not match the expected type.
    #[error("Failed to decode response body (status {code}): {source}")]
    Decode {
        /// The HTTP status of the response.
        code: u16,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A collection response lacked its element array.
    #[error("Response body has no '{field}' collection")]
    MissingField {
        /// The collection field that was expected.
        field: String,
    },
}

impl RestError {
    /// Returns the HTTP status code associated with the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            Self::Decode { code, .. } => Some(*code),
            Self::Payload(_) | Self::MissingField { .. } => None,
        }
    }

    /// Returns `true` if the platform answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}
