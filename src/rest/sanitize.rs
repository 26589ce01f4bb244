//! Payload sanitization.
//!
//! Many platform resources are read and written in the same representation,
//! but fields the server assigns (ids, timestamps, `self` links, counters)
//! must not be sent back on create or update. Each call site declares the
//! fields to strip as literal [`FieldPath`] data; [`sanitize`] serializes the
//! payload into a JSON tree and removes them before the body is attached.
//!
//! Removal is best-effort redaction, not validation: a path that does not
//! resolve to an object key is ignored.
//!
//! # Example
//!
//! ```rust
//! use iot_platform_api::rest::{sanitize, FieldPath};
//! use serde_json::json;
//!
//! const ALARM_CREATE: &[FieldPath] = &[
//!     FieldPath::new(&["id"]),
//!     FieldPath::new(&["self"]),
//!     FieldPath::new(&["creationTime"]),
//!     FieldPath::new(&["source", "self"]),
//! ];
//!
//! let alarm = json!({
//!     "id": "17",
//!     "self": "https://tenant.example.com/alarm/alarms/17",
//!     "creationTime": "2024-05-01T10:00:00.000Z",
//!     "type": "c8y_Overheat",
//!     "source": {"id": "10200", "self": "https://tenant.example.com/inventory/managedObjects/10200"}
//! });
//!
//! let body = sanitize(&alarm, ALARM_CREATE).unwrap();
//! assert_eq!(body, json!({"type": "c8y_Overheat", "source": {"id": "10200"}}));
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::clients::RequestBody;

/// Error returned when a payload cannot be encoded as a JSON tree.
#[derive(Debug, Error)]
#[error("Failed to encode request payload: {0}")]
pub struct PayloadError(#[from] serde_json::Error);

/// A nested object-key path naming a field to strip from a payload.
///
/// Paths are `const`-constructible so call sites can declare their removal
/// lists as constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath(&'static [&'static str]);

impl FieldPath {
    /// Creates a path from its keys, outermost first.
    #[must_use]
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self(keys)
    }

    /// Returns the keys, outermost first.
    #[must_use]
    pub const fn keys(&self) -> &'static [&'static str] {
        self.0
    }

    /// Removes this field from `tree`. Returns `true` if a value was removed.
    pub fn remove_from(&self, tree: &mut Value) -> bool {
        remove_field(tree, self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Serializes a payload into a JSON tree.
///
/// The payload itself is only borrowed; sanitizing the returned tree never
/// affects the caller's value.
///
/// # Errors
///
/// Returns [`PayloadError`] if the payload's `Serialize` implementation fails,
/// e.g. for a map with non-string keys.
pub fn to_structured<T: Serialize + ?Sized>(body: &T) -> Result<Value, PayloadError> {
    Ok(serde_json::to_value(body)?)
}

/// Removes the field at `path` from `tree`.
///
/// Walks `path[..n-1]` as object keys and deletes `path[n-1]` from the object
/// found there. Returns `true` if a value was removed.
///
/// This is a no-op when:
/// - `path` is empty
/// - an intermediate key is missing
/// - an intermediate or final node is not an object (arrays are not walked)
/// - the final key is already absent, so repeated removal is harmless
///
/// ```rust
/// use iot_platform_api::rest::remove_field;
/// use serde_json::json;
///
/// let mut tree = json!({"a": {"b": 1, "c": 2}});
/// assert!(remove_field(&mut tree, &["a", "b"]));
/// assert!(!remove_field(&mut tree, &["a", "b"]));
/// assert_eq!(tree, json!({"a": {"c": 2}}));
/// ```
pub fn remove_field(tree: &mut Value, path: &[&str]) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };

    let mut node = tree;
    for key in parents {
        match node.get_mut(*key) {
            Some(child) if child.is_object() => node = child,
            _ => return false,
        }
    }

    node.as_object_mut()
        .and_then(|object| object.remove(*last))
        .is_some()
}

/// Serializes `body` and strips every field named by `rules`.
///
/// Rules are applied once each, in order.
///
/// # Errors
///
/// Returns [`PayloadError`] if `body` cannot be serialized.
pub fn sanitize<T: Serialize + ?Sized>(body: &T, rules: &[FieldPath]) -> Result<Value, PayloadError> {
    let mut tree = to_structured(body)?;
    for rule in rules {
        if rule.remove_from(&mut tree) {
            tracing::trace!("Removed read-only field {} from request payload", rule);
        }
    }
    Ok(tree)
}

impl RequestBody {
    /// Builds a JSON body from a sanitized payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if `body` cannot be serialized.
    pub fn sanitized<T: Serialize + ?Sized>(
        body: &T,
        rules: &[FieldPath],
    ) -> Result<Self, PayloadError> {
        sanitize(body, rules).map(Self::Json)
    }
}
