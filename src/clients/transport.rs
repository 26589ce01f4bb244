//! The transport seam.
//!
//! The request builder and payload sanitizer are pure value transformations;
//! the only asynchronous boundary is a [`Transport`] executing a finalized
//! [`HttpRequest`]. [`HttpClient`](crate::clients::HttpClient) is the default
//! implementation; hosts that own their connection stack (or tests) can
//! supply their own.

use std::future::Future;

use crate::clients::{HttpError, HttpRequest, HttpResponse};

/// Executes finalized requests.
///
/// Implementations are shared by every request made through a
/// [`RestClient`](crate::rest::RestClient), so they must be safe for
/// concurrent use. Timeouts and cancellation are the implementation's
/// concern; dropping the returned future cancels the request.
pub trait Transport: Send + Sync {
    /// Sends the request and resolves to the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for invalid descriptors, network faults, and
    /// non-2xx responses.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).execute(request)
    }
}
