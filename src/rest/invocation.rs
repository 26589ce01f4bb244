//! Request finalization.
//!
//! [`Invocation`] is the handle returned by
//! [`ResourceTarget::request`](crate::rest::ResourceTarget::request). It
//! collects call-site headers and then produces an [`HttpRequest`] from a
//! verb and an optional body. Finalization never fails; descriptor problems
//! are reported by the transport when the request is executed.
//!
//! # Example
//!
//! ```rust
//! use iot_platform_api::rest::ResourceTarget;
//! use iot_platform_api::{HttpMethod, MediaType, ProcessingMode};
//! use serde_json::json;
//!
//! let request = ResourceTarget::root()
//!     .path("event/events")
//!     .request()
//!     .accept(MediaType::vendor("event"))
//!     .content_type(MediaType::vendor("event"))
//!     .processing_mode(ProcessingMode::Transient)
//!     .post(json!({"type": "c8y_Door", "text": "Door opened"}));
//!
//! assert_eq!(request.http_method, HttpMethod::Post);
//! assert_eq!(request.header("X-Cumulocity-Processing-Mode"), Some("TRANSIENT"));
//! ```

use std::collections::HashMap;

use crate::clients::{HttpMethod, HttpRequest, MediaType, ProcessingMode, RequestBody};
use crate::clients::PROCESSING_MODE_HEADER;
use crate::rest::query::QueryParams;

/// Builder for the headers and verb of a single request.
#[derive(Clone, Debug)]
pub struct Invocation {
    segments: Vec<String>,
    query: QueryParams,
    headers: HashMap<String, String>,
    tries: Option<u32>,
}

impl Invocation {
    pub(crate) fn new(segments: Vec<String>, query: QueryParams) -> Self {
        Self {
            segments,
            query,
            headers: HashMap::new(),
            tries: None,
        }
    }

    /// Sets the `Accept` header.
    #[must_use]
    pub fn accept(self, media_type: MediaType) -> Self {
        self.header("Accept", media_type.as_ref())
    }

    /// Sets the `Content-Type` header for JSON bodies.
    #[must_use]
    pub fn content_type(self, media_type: MediaType) -> Self {
        self.header("Content-Type", media_type.as_ref())
    }

    /// Selects synchronous or asynchronous server-side handling.
    #[must_use]
    pub fn processing_mode(self, mode: ProcessingMode) -> Self {
        self.header(PROCESSING_MODE_HEADER, mode.as_header_value())
    }

    /// Adds a header. A later call with the same name (ignoring case)
    /// replaces the earlier value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Sets the number of times to attempt the request.
    ///
    /// When unset, the client's configured default is used.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Finalizes a GET request.
    #[must_use]
    pub fn get(self) -> HttpRequest {
        self.method(HttpMethod::Get, None)
    }

    /// Finalizes a DELETE request.
    #[must_use]
    pub fn delete(self) -> HttpRequest {
        self.method(HttpMethod::Delete, None)
    }

    /// Finalizes a POST request.
    #[must_use]
    pub fn post(self, body: impl Into<RequestBody>) -> HttpRequest {
        self.method(HttpMethod::Post, Some(body.into()))
    }

    /// Finalizes a PUT request.
    #[must_use]
    pub fn put(self, body: impl Into<RequestBody>) -> HttpRequest {
        self.method(HttpMethod::Put, Some(body.into()))
    }

    /// Finalizes a request with any verb and optional body.
    #[must_use]
    pub fn method(self, http_method: HttpMethod, body: Option<RequestBody>) -> HttpRequest {
        let mut headers = self.headers;
        if matches!(body, Some(RequestBody::Json(_)))
            && !headers
                .keys()
                .any(|name| name.eq_ignore_ascii_case("Content-Type"))
        {
            headers.insert("Content-Type".to_string(), MediaType::JSON.to_string());
        }

        HttpRequest {
            http_method,
            segments: self.segments,
            query: self.query,
            headers,
            body,
            tries: self.tries,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::clients::{HttpMethod, MediaType, RequestBody};
    use crate::rest::ResourceTarget;
    use serde_json::json;

    #[test]
    fn test_get_carries_path_and_query() {
        let request = ResourceTarget::root()
            .path("inventory/managedObjects")
            .query_param("fragmentType", "c8y_IsDevice")
            .request()
            .accept(MediaType::vendor("managedobjectcollection"))
            .get();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.path(), "inventory/managedObjects");
        assert_eq!(request.query.get("fragmentType"), Some("c8y_IsDevice"));
        assert_eq!(
            request.header("Accept"),
            Some("application/vnd.com.nsn.cumulocity.managedobjectcollection+json")
        );
        assert!(request.body.is_none());
        assert!(request.header("Content-Type").is_none());
    }

    #[test]
    fn test_json_body_defaults_content_type() {
        let request = ResourceTarget::root()
            .path("event/events")
            .request()
            .post(json!({"type": "c8y_Test"}));

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body, Some(RequestBody::Json(json!({"type": "c8y_Test"}))));
    }

    #[test]
    fn test_explicit_content_type_wins() {
        let request = ResourceTarget::root()
            .path("event/events")
            .request()
            .header("content-type", "application/vnd.com.nsn.cumulocity.event+json")
            .put(json!({}));

        assert_eq!(request.headers.len(), 1);
        assert_eq!(
            request.header("Content-Type"),
            Some("application/vnd.com.nsn.cumulocity.event+json")
        );
    }

    #[test]
    fn test_header_replaces_case_insensitively() {
        let request = ResourceTarget::root()
            .request()
            .header("accept", "text/plain")
            .accept(MediaType::JSON)
            .get();

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn test_bytes_body_does_not_get_json_content_type() {
        let request = ResourceTarget::root()
            .path("inventory/binaries")
            .request()
            .post(RequestBody::Bytes {
                content_type: MediaType::OCTET_STREAM,
                data: vec![0xde, 0xad],
            });

        assert!(request.header("Content-Type").is_none());
        assert!(request.verify().is_ok());
    }

    #[test]
    fn test_post_without_body_fails_only_on_verify() {
        let request = ResourceTarget::root()
            .path("alarm/alarms")
            .request()
            .tries(3)
            .method(HttpMethod::Post, None);

        assert_eq!(request.tries, Some(3));
        assert!(request.verify().is_err());
    }
}
