//! Query parameter composition.
//!
//! Endpoint code passes every optional filter on every call, whether or not
//! the caller set it. A value that converts to `None` is therefore *absent*
//! and never reaches the query string, rather than being sent as `name=`.
//!
//! Arrays are serialized with one of two wire conventions chosen per call
//! site by [`ArrayStyle`]:
//!
//! - [`ArrayStyle::Exploded`]: `severity=MAJOR&severity=MINOR`
//! - [`ArrayStyle::Joined`]: `ids=1,2,3`
//!
//! # Example
//!
//! ```rust
//! use iot_platform_api::rest::{ArrayStyle, QueryParams};
//!
//! let mut query = QueryParams::new();
//! query.push("pageSize", 50);
//! query.push("source", None::<&str>);
//! query.push_all("severity", ["MAJOR", "MINOR"], ArrayStyle::Exploded);
//! query.push_all("ids", [Some(1), None, Some(3)], ArrayStyle::Joined);
//!
//! assert_eq!(
//!     query.to_query_string(),
//!     "pageSize=50&severity=MAJOR&severity=MINOR&ids=1,3"
//! );
//! ```

use std::fmt::Write as _;

/// Wire convention for array-valued query parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrayStyle {
    /// One `name=value` pair per element.
    Exploded,
    /// A single `name=v1,v2` pair.
    Joined,
}

impl ArrayStyle {
    /// Maps the generated layer's `explode` flag onto a style.
    #[must_use]
    pub const fn from_explode(explode: bool) -> Self {
        if explode {
            Self::Exploded
        } else {
            Self::Joined
        }
    }
}

/// Types that can be used as a query parameter value.
///
/// Returning `None` marks the value as absent.
pub trait QueryValue {
    /// Renders the value, or `None` when the parameter should be omitted.
    fn to_query_value(&self) -> Option<String>;
}

impl QueryValue for str {
    fn to_query_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl QueryValue for String {
    fn to_query_value(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn to_query_value(&self) -> Option<String> {
        self.as_ref().and_then(QueryValue::to_query_value)
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query_value(&self) -> Option<String> {
        (**self).to_query_value()
    }
}

macro_rules! display_query_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl QueryValue for $t {
                fn to_query_value(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

display_query_value!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// An ordered set of query parameters.
///
/// Pairs keep call order and the same name may appear more than once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Appends `name=value`, or does nothing if `value` is absent.
    pub fn push(&mut self, name: impl Into<String>, value: impl QueryValue) {
        if let Some(value) = value.to_query_value() {
            self.pairs.push((name.into(), value));
        }
    }

    /// Appends an array-valued parameter using the given wire convention.
    ///
    /// Absent elements are skipped in both styles. With
    /// [`ArrayStyle::Joined`], a parameter whose joined value would be empty
    /// is omitted entirely.
    pub fn push_all<I>(&mut self, name: impl Into<String>, values: I, style: ArrayStyle)
    where
        I: IntoIterator,
        I::Item: QueryValue,
    {
        let name = name.into();
        let mut present = values.into_iter().filter_map(|v| v.to_query_value());
        match style {
            ArrayStyle::Exploded => {
                self.pairs.extend(present.map(|value| (name.clone(), value)));
            }
            ArrayStyle::Joined => {
                let mut joined = present.next().unwrap_or_default();
                for value in present {
                    joined.push(',');
                    joined.push_str(&value);
                }
                if !joined.is_empty() {
                    self.pairs.push((name, joined));
                }
            }
        }
    }

    /// Returns the pairs in call order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value for `name`, in order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns `true` if no parameter has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Renders the percent-encoded query string, without the leading `?`.
    ///
    /// Commas stay literal so joined arrays reach the server as
    /// `name=v1,v2`; everything outside the unreserved set is escaped.
    /// This is exactly the query string the transport sends.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            let _ = write!(out, "{}=", encode_component(name));
            out.push_str(&encode_component(value));
        }
        out
    }
}

/// Percent-encodes a query component, leaving `,` unescaped.
fn encode_component(component: &str) -> String {
    component
        .split(',')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join(",")
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = &'a (String, String);
    type IntoIter = std::slice::Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
