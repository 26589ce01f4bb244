//! Validated newtype wrappers for configuration values.
//!
//! Invalid values are rejected on construction with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated base URL for the platform's REST API.
///
/// The base URL is the resource root every request path is appended to. It
/// may carry a path prefix (e.g. `https://tenant.example.com/service`); any
/// trailing `/` is removed so that joining segments never produces `//`.
///
/// # Example
///
/// ```rust
/// use iot_platform_api::BaseUrl;
///
/// let url = BaseUrl::new("https://tenant.example.com/service/").unwrap();
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "tenant.example.com");
/// assert_eq!(url.as_ref(), "https://tenant.example.com/service");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme, a
    /// non-alphabetic scheme, or no host. Query strings and fragments are
    /// rejected too, since request query parameters are appended to this URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() || url.contains(['?', '#']) {
            return Err(invalid());
        }

        let authority = &url[host_start..];
        let host_len = if authority.starts_with('[') {
            // IPv6 literal: host runs through the closing bracket
            let close = authority.find(']').ok_or_else(invalid)?;
            let after = authority.as_bytes().get(close + 1);
            if close == 1 || !matches!(after, None | Some(b':' | b'/')) {
                return Err(invalid());
            }
            close + 1
        } else {
            // Host ends at port, path, or end of string
            authority.find([':', '/']).unwrap_or(authority.len())
        };
        if host_len == 0 {
            return Err(invalid());
        }
        let host_end = host_start + host_len;

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Joins already-encoded path segments onto this base URL.
    #[must_use]
    pub fn join(&self, encoded_path: &str) -> String {
        if encoded_path.is_empty() {
            self.url.clone()
        } else {
            format!("{}/{encoded_path}", self.url)
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BaseUrl").field(&self.url).finish()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
