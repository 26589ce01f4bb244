//! Typed response wrapper.
//!
//! [`ApiResponse<T>`] pairs decoded data with the response metadata endpoint
//! callers commonly need. It implements `Deref<Target = T>`:
//!
//! ```rust
//! use iot_platform_api::rest::ApiResponse;
//!
//! let response = ApiResponse::new(vec!["a", "b"], 200);
//! assert_eq!(response.len(), 2);
//! assert_eq!(response[0], "a");
//! ```

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::clients::{HttpResponse, PageStatistics};
use crate::rest::RestError;

/// Decoded response data with metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    data: T,
    code: u16,
    request_id: Option<String>,
    location: Option<String>,
    statistics: Option<PageStatistics>,
    next_page: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Creates a response with no metadata beyond the status code.
    #[must_use]
    pub const fn new(data: T, code: u16) -> Self {
        Self {
            data,
            code,
            request_id: None,
            location: None,
            statistics: None,
            next_page: None,
        }
    }

    fn with_metadata(data: T, response: &HttpResponse) -> Self {
        Self {
            data,
            code: response.code,
            request_id: response.request_id().map(String::from),
            location: response.location().map(String::from),
            statistics: response.statistics(),
            next_page: response.next_page().map(String::from),
        }
    }

    /// Consumes the response and returns the inner data.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Returns a reference to the inner data.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the `Location` header of a create response, if present.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns paging statistics for collection responses.
    #[must_use]
    pub const fn statistics(&self) -> Option<&PageStatistics> {
        self.statistics.as_ref()
    }

    /// Returns the link to the next page of a collection, if present.
    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Transforms the data, keeping the metadata.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            code: self.code,
            request_id: self.request_id,
            location: self.location,
            statistics: self.statistics,
            next_page: self.next_page,
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decodes the whole response body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Decode`] if the body does not match `T`.
    pub fn from_response(response: HttpResponse) -> Result<Self, RestError> {
        let data = T::deserialize(&response.body).map_err(|source| RestError::Decode {
            code: response.code,
            source,
        })?;
        Ok(Self::with_metadata(data, &response))
    }
}

impl<T: DeserializeOwned> ApiResponse<Vec<T>> {
    /// Decodes the array under `field` of a collection body, e.g. `alarms`
    /// in `{"alarms": [...], "statistics": {...}}`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::MissingField`] if `field` is absent and
    /// [`RestError::Decode`] if the elements do not match `T`.
    pub fn from_collection(response: HttpResponse, field: &str) -> Result<Self, RestError> {
        let items = response
            .body
            .get(field)
            .ok_or_else(|| RestError::MissingField {
                field: field.to_string(),
            })?;
        let data = Vec::<T>::deserialize(items).map_err(|source| RestError::Decode {
            code: response.code,
            source,
        })?;
        Ok(Self::with_metadata(data, &response))
    }
}

impl ApiResponse<()> {
    /// Wraps a response whose body is not needed (e.g. DELETE).
    #[must_use]
    pub fn empty(response: &HttpResponse) -> Self {
        Self::with_metadata((), response)
    }
}

impl<T> Deref for ApiResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for ApiResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
