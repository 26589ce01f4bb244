//! HTTP transport layer for the platform API.
//!
//! This module turns finalized request descriptors into HTTP exchanges. It
//! knows nothing about individual resources; endpoint code builds requests
//! with [`crate::rest`] and hands them to a [`Transport`].
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpRequest`]: A finalized request descriptor
//! - [`HttpResponse`]: A parsed response from the platform
//! - [`Transport`]: The seam between request building and execution
//! - [`HttpClient`]: The default reqwest-backed [`Transport`]
//! - [`HttpMethod`], [`MediaType`], [`ProcessingMode`], [`RequestBody`]:
//!   the parts of a descriptor
//! - [`HttpError`]: Unified transport error type
//!
//! # Example
//!
//! ```rust,ignore
//! use iot_platform_api::{BaseUrl, HttpClient, MediaType, PlatformConfig};
//! use iot_platform_api::rest::ResourceTarget;
//!
//! let config = PlatformConfig::builder()
//!     .base_url(BaseUrl::new("https://tenant.example.com")?)
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = ResourceTarget::root()
//!     .path("measurement/measurements")
//!     .query_param("source", "10200")
//!     .request()
//!     .accept(MediaType::vendor("measurementcollection"))
//!     .get();
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! The client implements automatic retry logic for transient failures:
//!
//! - **429 (Too Many Requests)**: Retries using the `Retry-After` header value,
//!   capped at [`MAX_RETRY_AFTER`] seconds, or 1 second if it is absent or
//!   unusable
//! - **500 / 503**: Retries with a fixed 1-second delay
//! - **Other errors (4xx)**: Returns immediately without retry
//!
//! The default `tries` is 1, meaning no automatic retries. Raise it for all
//! requests with [`PlatformConfigBuilder::tries`](crate::PlatformConfigBuilder::tries)
//! or per request with [`Invocation::tries`](crate::rest::Invocation::tries).

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, MAX_RETRY_AFTER, RETRY_WAIT_TIME, SDK_VERSION};
pub use http_request::{
    HttpMethod, HttpRequest, MediaType, ProcessingMode, RequestBody, PROCESSING_MODE_HEADER,
};
pub use http_response::{HttpResponse, PageStatistics};
pub use transport::Transport;
