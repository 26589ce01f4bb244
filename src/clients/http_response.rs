//! Raw response envelope.
//!
//! [`HttpResponse`] is what a [`Transport`](crate::clients::Transport)
//! returns: status, headers, and the body parsed as a JSON tree. Typed
//! decoding happens one layer up in [`crate::rest`].

use std::collections::HashMap;

use serde::Deserialize;

/// Paging statistics from a collection response's `statistics` object.
///
/// ```rust
/// use iot_platform_api::PageStatistics;
/// use serde_json::json;
///
/// let body = json!({
///     "alarms": [],
///     "statistics": {"currentPage": 2, "pageSize": 5, "totalPages": 7}
/// });
///
/// let stats = PageStatistics::from_body(&body).unwrap();
/// assert_eq!(stats.current_page, Some(2));
/// assert_eq!(stats.total_pages, Some(7));
/// assert!(stats.has_more_pages());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStatistics {
    /// The page returned, starting at 1.
    pub current_page: Option<u64>,
    /// The page size used by the server.
    pub page_size: Option<u64>,
    /// Total number of pages, present when `withTotalPages=true` was requested.
    pub total_pages: Option<u64>,
    /// Total number of elements, present when `withTotalElements=true` was requested.
    pub total_elements: Option<u64>,
}

impl PageStatistics {
    /// Parses the `statistics` object of a collection body.
    #[must_use]
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        body.get("statistics")
            .and_then(|stats| Self::deserialize(stats).ok())
    }

    /// Returns `true` if the server reported pages after the current one.
    ///
    /// Without `totalPages` this cannot be known and returns `false`; use the
    /// collection's `next` link instead.
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        matches!(
            (self.current_page, self.total_pages),
            (Some(current), Some(total)) if current < total
        )
    }
}

/// A response from the platform API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, names lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body: `Null` when empty, a JSON string holding the
    /// raw text when the body is not JSON.
    pub body: serde_json::Value,
    /// Seconds to wait before retrying (from `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            retry_request_after,
        }
    }

    /// Parses a body as received on the wire.
    #[must_use]
    pub fn parse_body(text: &str) -> serde_json::Value {
        if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(text)
                .unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `Location` header of a create response.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns the identifier of a created resource: the last path segment
    /// of the `Location` header.
    #[must_use]
    pub fn resource_id(&self) -> Option<&str> {
        self.location()
            .map(|location| location.split(['?', '#']).next().unwrap_or(location))
            .and_then(|path| path.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty())
    }

    /// Returns paging statistics when the body is a collection page.
    #[must_use]
    pub fn statistics(&self) -> Option<PageStatistics> {
        PageStatistics::from_body(&self.body)
    }

    /// Returns the collection's `next` page link, if present.
    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.body.get("next").and_then(serde_json::Value::as_str)
    }

    /// Builds a human-readable error message from the platform error body.
    ///
    /// Prefers `message`, falls back to `error`, then to the raw body text.
    #[must_use]
    pub fn error_message(&self) -> String {
        let field = |name: &str| self.body.get(name).and_then(serde_json::Value::as_str);
        match (field("message"), field("error")) {
            (Some(message), _) | (None, Some(message)) => message.to_string(),
            (None, None) => match &self.body {
                serde_json::Value::Null => format!("empty response body (status {})", self.code),
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        }
    }

    /// Returns the platform's error code (e.g. `alarm/Not Found`), falling
    /// back to the request id.
    #[must_use]
    pub fn error_reference(&self) -> Option<String> {
        self.body
            .get("error")
            .and_then(serde_json::Value::as_str)
            .or_else(|| self.request_id())
            .map(String::from)
    }
}
