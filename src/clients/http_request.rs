//! Request descriptor types.
//!
//! An [`HttpRequest`] is the terminal, immutable artifact of the request
//! builder in [`crate::rest`]: resource path segments, query parameters,
//! headers, verb, and optional body, ready to hand to a
//! [`Transport`](crate::clients::Transport).

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;
use crate::rest::QueryParams;

/// Header selecting how the platform processes a write request.
pub const PROCESSING_MODE_HEADER: &str = "X-Cumulocity-Processing-Mode";

/// HTTP methods supported by the platform API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` for methods that must carry a request body.
    #[must_use]
    pub const fn requires_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A media type used in `Accept` and `Content-Type` headers.
///
/// The platform uses vendor media types per resource; [`MediaType::vendor`]
/// builds them from the resource name.
///
/// # Example
///
/// ```rust
/// use iot_platform_api::MediaType;
///
/// let alarm = MediaType::vendor("alarm");
/// assert_eq!(alarm.as_ref(), "application/vnd.com.nsn.cumulocity.alarm+json");
/// assert_eq!(MediaType::JSON.as_ref(), "application/json");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaType(std::borrow::Cow<'static, str>);

impl MediaType {
    /// `application/json`.
    pub const JSON: Self = Self(std::borrow::Cow::Borrowed("application/json"));

    /// `application/octet-stream`.
    pub const OCTET_STREAM: Self = Self(std::borrow::Cow::Borrowed("application/octet-stream"));

    /// Creates a media type from an arbitrary MIME string.
    #[must_use]
    pub fn new(mime: impl Into<String>) -> Self {
        Self(std::borrow::Cow::Owned(mime.into()))
    }

    /// Creates the platform vendor media type for a resource, e.g.
    /// `application/vnd.com.nsn.cumulocity.managedobject+json`.
    #[must_use]
    pub fn vendor(resource: &str) -> Self {
        Self::new(format!("application/vnd.com.nsn.cumulocity.{resource}+json"))
    }
}

impl AsRef<str> for MediaType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-side processing mode for write requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessingMode {
    /// Store the data and forward it to real-time processing (platform default).
    Persistent,
    /// Forward to real-time processing without storing.
    Transient,
    /// Store without real-time notifications.
    Quiescent,
    /// Real-time processing only, without notifications or storage.
    Cep,
}

impl ProcessingMode {
    /// Returns the header value for this mode.
    #[must_use]
    pub const fn as_header_value(&self) -> &'static str {
        match self {
            Self::Persistent => "PERSISTENT",
            Self::Transient => "TRANSIENT",
            Self::Quiescent => "QUIESCENT",
            Self::Cep => "CEP",
        }
    }
}

/// A request body.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// A JSON document, usually produced by [`crate::rest::sanitize`].
    Json(serde_json::Value),
    /// Raw bytes for binary upload endpoints.
    Bytes {
        /// The body's content type.
        content_type: MediaType,
        /// The payload.
        data: Vec<u8>,
    },
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// A fully specified request, ready for dispatch.
///
/// Built through [`ResourceTarget::request`](crate::rest::ResourceTarget::request).
/// Two descriptors built from the same root with the same calls compare equal.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// Resource path segments relative to the configured base URL, unescaped.
    pub segments: Vec<String>,
    /// Query parameters in call order.
    pub query: QueryParams,
    /// Headers set by the call site.
    pub headers: HashMap<String, String>,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Number of times to attempt the request; `None` uses the client default.
    pub tries: Option<u32>,
}

impl HttpRequest {
    /// Returns the unescaped resource path, segments joined with `/`.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Returns the path with each segment percent-encoded.
    #[must_use]
    pub fn encoded_path(&self) -> String {
        self.segments
            .iter()
            .map(|segment| urlencoding::encode(segment))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Returns the value of a call-site header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Validates the request before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `http_method` is `Post` or `Put` but `body` is `None`
    /// - a byte body has an empty content type
    /// - `tries` is `Some(0)`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.http_method.requires_body() && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        if let Some(RequestBody::Bytes { content_type, .. }) = &self.body {
            if content_type.as_ref().trim().is_empty() {
                return Err(InvalidHttpRequestError::MissingContentType);
            }
        }

        if self.tries == Some(0) {
            return Err(InvalidHttpRequestError::InvalidTries);
        }

        Ok(())
    }
}
