//! Resource path composition.
//!
//! A [`ResourceTarget`] identifies a resource location (an ordered list of
//! path segments) together with the query parameters to send. Targets are
//! immutable values: every [`path`](ResourceTarget::path) or
//! [`query_param`](ResourceTarget::query_param) call yields a new target and
//! leaves the receiver untouched, so a shared root can be handed to any
//! number of concurrent callers without locking.
//!
//! # Example
//!
//! ```rust
//! use iot_platform_api::rest::{ArrayStyle, ResourceTarget};
//!
//! let root = ResourceTarget::root();
//! let alarms = root
//!     .path("alarm")
//!     .path("alarms")
//!     .query_param("source", Some("10200"))
//!     .query_param("resolved", None::<bool>)
//!     .query_params("severity", ["MAJOR", "CRITICAL"], ArrayStyle::Exploded);
//!
//! assert_eq!(alarms.segments(), ["alarm", "alarms"]);
//! assert_eq!(
//!     alarms.query().to_query_string(),
//!     "source=10200&severity=MAJOR&severity=CRITICAL"
//! );
//!
//! // The root is unchanged.
//! assert!(root.segments().is_empty());
//! ```

use std::fmt;

use crate::rest::invocation::Invocation;
use crate::rest::query::{ArrayStyle, QueryParams, QueryValue};

/// An immutable resource location plus query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceTarget {
    segments: Vec<String>,
    query: QueryParams,
}

impl ResourceTarget {
    /// Creates the root target: no segments and no query parameters. The
    /// configured base URL supplies the service root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
            query: QueryParams::new(),
        }
    }

    /// Returns a target with `segment` appended.
    ///
    /// A segment containing `/` contributes each of its non-empty pieces, so
    /// `path("a").path("b")` and `path("a/b")` address the same resource.
    /// Characters are not validated; escaping is done by the transport.
    #[must_use]
    pub fn path(&self, segment: impl AsRef<str>) -> Self {
        let mut next = self.clone();
        next.segments.extend(
            segment
                .as_ref()
                .split('/')
                .filter(|piece| !piece.is_empty())
                .map(String::from),
        );
        next
    }

    /// Returns a target with `name=value` added, or an identical target when
    /// `value` is absent.
    #[must_use]
    pub fn query_param(&self, name: impl Into<String>, value: impl QueryValue) -> Self {
        let mut next = self.clone();
        next.query.push(name, value);
        next
    }

    /// Returns a target with an array-valued parameter added.
    ///
    /// See [`QueryParams::push_all`] for how absent elements and empty
    /// joined values are handled.
    #[must_use]
    pub fn query_params<I>(&self, name: impl Into<String>, values: I, style: ArrayStyle) -> Self
    where
        I: IntoIterator,
        I::Item: QueryValue,
    {
        let mut next = self.clone();
        next.query.push_all(name, values, style);
        next
    }

    /// Returns the path segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the query parameters.
    #[must_use]
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Returns the unescaped path, segments joined with `/`.
    #[must_use]
    pub fn path_string(&self) -> String {
        self.segments.join("/")
    }

    /// Finalizes the target into an [`Invocation`] that accepts headers, a
    /// verb, and an optional body.
    #[must_use]
    pub fn request(&self) -> Invocation {
        Invocation::new(self.segments.clone(), self.query.clone())
    }
}

impl fmt::Display for ResourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path_string())?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query.to_query_string())?;
        }
        Ok(())
    }
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceTarget>();
};
