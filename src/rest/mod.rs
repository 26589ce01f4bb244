//! Request building and typed execution for platform resources.
//!
//! Endpoint code uses this module in three steps:
//!
//! 1. Derive a [`ResourceTarget`] from a client's root with
//!    [`ResourceTarget::path`], [`ResourceTarget::query_param`] and
//!    [`ResourceTarget::query_params`]. Each call returns a new target;
//!    the receiver is never changed.
//! 2. Finalize it with [`ResourceTarget::request`], set headers on the
//!    returned [`Invocation`], and pick a verb to get an
//!    [`HttpRequest`](crate::HttpRequest).
//! 3. Execute the request with a [`RestClient`] and decode the body into an
//!    [`ApiResponse`].
//!
//! Write payloads go through [`sanitize`] first, which serializes the value
//! and strips the read-only fields named by a list of [`FieldPath`]s.
//!
//! # Example
//!
//! ```rust
//! use iot_platform_api::rest::{sanitize, ArrayStyle, FieldPath, ResourceTarget};
//! use serde_json::json;
//!
//! let root = ResourceTarget::root();
//! let alarms = root.path("alarm").path("alarms");
//!
//! let list = alarms
//!     .query_param("source", "10200")
//!     .query_param("resolved", None::<bool>)
//!     .query_params("status", ["ACTIVE", "ACKNOWLEDGED"], ArrayStyle::Joined)
//!     .request()
//!     .get();
//! assert_eq!(list.path(), "alarm/alarms");
//! assert_eq!(list.query.to_query_string(), "source=10200&status=ACTIVE,ACKNOWLEDGED");
//!
//! let body = sanitize(
//!     &json!({"id": "1", "severity": "MAJOR"}),
//!     &[FieldPath::new(&["id"])],
//! )
//! .unwrap();
//! let create = alarms.request().post(body);
//! assert_eq!(create.body, Some(json!({"severity": "MAJOR"}).into()));
//! assert!(root.segments().is_empty());
//! ```

mod client;
mod errors;
mod invocation;
mod path;
mod query;
mod response;
mod sanitize;

pub use client::RestClient;
pub use errors::RestError;
pub use invocation::Invocation;
pub use path::ResourceTarget;
pub use query::{ArrayStyle, QueryParams, QueryValue};
pub use response::ApiResponse;
pub use sanitize::{remove_field, sanitize, to_structured, FieldPath, PayloadError};
