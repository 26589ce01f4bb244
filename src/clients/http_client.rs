//! Default reqwest-backed transport.
//!
//! [`HttpClient`] turns an [`HttpRequest`] descriptor into a wire request
//! against the configured base URL, with automatic retry handling.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::clients::errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
use crate::clients::http_request::{HttpMethod, HttpRequest, RequestBody};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::Transport;
use crate::config::{BaseUrl, PlatformConfig};

/// Fixed retry wait time in seconds.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Upper bound in seconds on a server-requested `Retry-After` wait.
pub const MAX_RETRY_AFTER: u64 = 300;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the platform API.
///
/// The client handles:
/// - URL construction from the base URL and escaped path segments
/// - Default headers: User-Agent, `Accept`, and host-injected headers
/// - Automatic retry for 429, 500, and 503 responses
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`; one instance serves concurrent requests.
///
/// # Example
///
/// ```rust,ignore
/// use iot_platform_api::{BaseUrl, HttpClient, PlatformConfig};
/// use iot_platform_api::rest::ResourceTarget;
///
/// let config = PlatformConfig::builder()
///     .base_url(BaseUrl::new("https://tenant.example.com").unwrap())
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = ResourceTarget::root()
///     .path("inventory/managedObjects")
///     .query_param("pageSize", 10)
///     .request()
///     .get();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Resource root every request path extends.
    base_url: BaseUrl,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Attempts for requests that do not set their own.
    default_tries: u32,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: &PlatformConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}IoT Platform API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        for (name, value) in config.default_headers() {
            default_headers.insert(name.clone(), value.clone());
        }

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            default_headers,
            default_tries: config.tries(),
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the full URL a request is sent to.
    ///
    /// The query string is [`QueryParams::to_query_string`] verbatim, so
    /// what is logged is byte-for-byte what goes on the wire.
    ///
    /// [`QueryParams::to_query_string`]: crate::rest::QueryParams::to_query_string
    #[must_use]
    pub fn url_for(&self, request: &HttpRequest) -> String {
        let url = self.base_url.join(&request.encoded_path());
        if request.query.is_empty() {
            url
        } else {
            format!("{url}?{}", request.query.to_query_string())
        }
    }

    /// Sends a request to the platform API.
    ///
    /// This method handles:
    /// - Request validation
    /// - URL construction and segment escaping
    /// - Header merging (call-site headers win over defaults)
    /// - Response parsing
    /// - Retry logic for 429, 500, and 503 responses
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    /// - Max retries exceeded (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.url_for(&request);
        let headers = self.merge_headers(&request)?;
        let max_tries = request.tries.unwrap_or(self.default_tries);

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Put => self.client.put(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            req_builder = req_builder.headers(headers.clone());

            match &request.body {
                Some(RequestBody::Json(value)) => {
                    req_builder = req_builder.body(value.to_string());
                }
                Some(RequestBody::Bytes { data, .. }) => {
                    req_builder = req_builder.body(data.clone());
                }
                None => {}
            }

            tracing::debug!(
                "Sending {} request to {} (attempt {} of {})",
                request.http_method,
                url,
                tries,
                max_tries
            );

            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await?;

            let response = HttpResponse::new(code, res_headers, HttpResponse::parse_body(&body_text));

            if response.is_ok() {
                return Ok(response);
            }

            let message = response.error_message();
            let error_reference = response.error_reference();

            let should_retry = matches!(code, 429 | 500 | 503);
            if !should_retry {
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    message,
                    error_reference,
                }));
            }

            if tries >= max_tries {
                if max_tries == 1 {
                    return Err(HttpError::Response(HttpResponseError {
                        code,
                        message,
                        error_reference,
                    }));
                }
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: max_tries,
                    message,
                    error_reference,
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::warn!(
                "Request to {} failed with status {}, retrying in {:?}",
                request.path(),
                code,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Merges default headers, the body's content type, and call-site headers.
    fn merge_headers(&self, request: &HttpRequest) -> Result<HeaderMap, InvalidHttpRequestError> {
        let mut headers = HeaderMap::new();
        let mut insert = |name: &str, value: &str| -> Result<(), InvalidHttpRequestError> {
            let invalid = || InvalidHttpRequestError::InvalidHeader {
                name: name.to_string(),
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
            Ok(())
        };

        for (name, value) in &self.default_headers {
            insert(name, value)?;
        }

        match &request.body {
            Some(RequestBody::Json(_)) => insert("Content-Type", "application/json")?,
            Some(RequestBody::Bytes { content_type, .. }) => {
                insert("Content-Type", content_type.as_ref())?;
            }
            None => {}
        }

        for (name, value) in &request.headers {
            insert(name, value)?;
        }

        Ok(headers)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay based on response and status code.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> Duration {
        // Retry-After is only honoured for 429
        if status == 429 {
            if let Some(delay) = response
                .retry_request_after
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            {
                return delay.min(Duration::from_secs(MAX_RETRY_AFTER));
            }
        }
        Duration::from_secs(RETRY_WAIT_TIME)
    }
}

impl Transport for HttpClient {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        self.request(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http_request::MediaType;
    use crate::rest::ResourceTarget;
    use serde_json::json;

    fn create_test_config() -> PlatformConfig {
        PlatformConfig::builder()
            .base_url(BaseUrl::new("https://tenant.example.com").unwrap())
            .default_header("Authorization", "Basic dGVzdA==")
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        assert_eq!(client.base_url().as_ref(), "https://tenant.example.com");
        assert_eq!(client.default_tries, 1);
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("IoT Platform API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = PlatformConfig::builder()
            .base_url(BaseUrl::new("https://tenant.example.com").unwrap())
            .user_agent_prefix("Gateway/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Gateway/1.0 | "));
    }

    #[test]
    fn test_injected_headers_are_defaults() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"Basic dGVzdA==".to_string())
        );
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_url_for_escapes_segments() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let request = ResourceTarget::root()
            .path("identity")
            .path("externalIds")
            .path("c8y_Serial")
            .path("SN 0042")
            .request()
            .get();

        assert_eq!(
            client.url_for(&request),
            "https://tenant.example.com/identity/externalIds/c8y_Serial/SN%200042"
        );
    }

    #[test]
    fn test_url_for_appends_query_with_literal_commas() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let request = ResourceTarget::root()
            .path("inventory/managedObjects")
            .query_params("ids", [1, 2, 3], crate::rest::ArrayStyle::Joined)
            .query_param("text", "a b")
            .request()
            .get();

        assert_eq!(
            client.url_for(&request),
            "https://tenant.example.com/inventory/managedObjects?ids=1,2,3&text=a%20b"
        );
    }

    #[test]
    fn test_call_site_headers_override_defaults() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let request = ResourceTarget::root()
            .path("alarm/alarms")
            .request()
            .accept(MediaType::vendor("alarm"))
            .content_type(MediaType::vendor("alarm"))
            .post(json!({"type": "c8y_Test"}));

        let headers = client.merge_headers(&request).unwrap();
        assert_eq!(
            headers.get("accept").unwrap(),
            "application/vnd.com.nsn.cumulocity.alarm+json"
        );
        assert_eq!(
            headers.get("content-type").unwrap(),
            "application/vnd.com.nsn.cumulocity.alarm+json"
        );
        assert_eq!(headers.get("authorization").unwrap(), "Basic dGVzdA==");
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let request = ResourceTarget::root()
            .request()
            .header("Bad Header", "value")
            .get();

        assert!(matches!(
            client.merge_headers(&request),
            Err(InvalidHttpRequestError::InvalidHeader { name }) if name == "Bad Header"
        ));
    }

    #[test]
    fn test_retry_delay_honours_retry_after_for_429_only() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["0.25".to_string()]);
        let response = HttpResponse::new(429, headers.clone(), json!({}));
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429),
            Duration::from_millis(250)
        );

        let response = HttpResponse::new(500, headers, json!({}));
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 500),
            Duration::from_secs(RETRY_WAIT_TIME)
        );
    }

    #[test]
    fn test_retry_delay_caps_oversized_retry_after() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["1e20".to_string()]);
        let response = HttpResponse::new(429, headers, json!({}));

        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429),
            Duration::from_secs(MAX_RETRY_AFTER)
        );
    }

    #[test]
    fn test_retry_delay_ignores_unusable_retry_after() {
        for value in ["-1", "NaN", "inf", "1e400"] {
            let mut headers = HashMap::new();
            headers.insert("retry-after".to_string(), vec![value.to_string()]);
            let response = HttpResponse::new(429, headers, json!({}));

            assert_eq!(
                HttpClient::calculate_retry_delay(&response, 429),
                Duration::from_secs(RETRY_WAIT_TIME),
                "Retry-After {value} should fall back to the fixed wait"
            );
        }
    }
}
