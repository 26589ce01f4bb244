//! Typed request execution.
//!
//! [`RestClient`] is what endpoint code holds: a shared, read-only root
//! [`ResourceTarget`] to derive requests from, and a [`Transport`] to run
//! them. Every call builds a fresh target and request; the client itself
//! is never mutated, so it can be shared across tasks.
//!
//! # Example
//!
//! ```rust,ignore
//! use iot_platform_api::rest::{sanitize, ApiResponse, FieldPath, RestClient};
//! use iot_platform_api::{BaseUrl, MediaType, PlatformConfig};
//!
//! const CREATE_EXCLUSIONS: &[FieldPath] = &[FieldPath::new(&["id"]), FieldPath::new(&["self"])];
//!
//! let config = PlatformConfig::builder()
//!     .base_url(BaseUrl::new("https://tenant.example.com")?)
//!     .build()?;
//! let client = RestClient::new(&config)?;
//!
//! let body = sanitize(&alarm, CREATE_EXCLUSIONS)?;
//! let request = client
//!     .target()
//!     .path("alarm/alarms")
//!     .request()
//!     .accept(MediaType::vendor("alarm"))
//!     .content_type(MediaType::vendor("alarm"))
//!     .post(body);
//! let created: ApiResponse<Alarm> = client.execute(request).await?;
//! ```

use serde::de::DeserializeOwned;

use crate::clients::{HttpClient, HttpRequest, HttpResponse, Transport};
use crate::config::PlatformConfig;
use crate::rest::errors::RestError;
use crate::rest::path::ResourceTarget;
use crate::rest::response::ApiResponse;

/// Client for endpoint code: a root target plus a transport.
#[derive(Debug)]
pub struct RestClient<T = HttpClient> {
    transport: T,
    root: ResourceTarget,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient<HttpClient> {
    /// Creates a client backed by the default reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the HTTP client cannot be created.
    pub fn new(config: &PlatformConfig) -> Result<Self, RestError> {
        tracing::debug!("Creating REST client for {}", config.base_url());
        Ok(Self::with_transport(HttpClient::new(config)?))
    }
}

impl<T: Transport> RestClient<T> {
    /// Creates a client over a caller-supplied transport.
    #[must_use]
    pub const fn with_transport(transport: T) -> Self {
        Self {
            transport,
            root: ResourceTarget::root(),
        }
    }

    /// Returns the root target. Derive per-call targets from it with
    /// [`ResourceTarget::path`]; the root itself never changes.
    #[must_use]
    pub const fn target(&self) -> &ResourceTarget {
        &self.root
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes a request and returns the raw response envelope.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for any transport failure or non-2xx status.
    pub async fn execute_raw(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
        Ok(self.transport.execute(request).await?)
    }

    /// Executes a request and decodes the body as `R`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for transport failures and
    /// [`RestError::Decode`] if the body does not match `R`.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<ApiResponse<R>, RestError> {
        let response = self.execute_raw(request).await?;
        ApiResponse::from_response(response)
    }

    /// Executes a collection request and decodes the array under `field`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for transport failures,
    /// [`RestError::MissingField`] if `field` is absent, and
    /// [`RestError::Decode`] if the elements do not match `R`.
    pub async fn execute_collection<R: DeserializeOwned>(
        &self,
        request: HttpRequest,
        field: &str,
    ) -> Result<ApiResponse<Vec<R>>, RestError> {
        let response = self.execute_raw(request).await?;
        ApiResponse::from_collection(response, field)
    }

    /// Executes a request whose body is not needed, such as a DELETE.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for any transport failure or non-2xx status.
    pub async fn execute_empty(&self, request: HttpRequest) -> Result<ApiResponse<()>, RestError> {
        let response = self.execute_raw(request).await?;
        Ok(ApiResponse::empty(&response))
    }
}
