// # DigitalOcean API Transport
//
// This crate provides the HTTP transport that carries dosync requests to the
// DigitalOcean API v2.
//
// ## Behaviour
//
// - One HTTP call per `send`; no retries, no backoff, no caching
// - Bearer authentication with the key attached to the request
// - A request without a key fails before any network I/O
// - 30 second timeout by default
// - An empty 2xx body decodes to an empty JSON object
//
// ## Status Mapping
//
// | Status    | Error                                   |
// |-----------|-----------------------------------------|
// | 401, 403  | `Error::Authentication`                 |
// | 404       | `Error::NotFound`                       |
// | 422       | `Error::Provider` (unprocessable)       |
// | 429       | `Error::RateLimited`                    |
// | 5xx       | `Error::Provider` (server error)        |
//
// ## Security
//
// The API token is never logged. It only lives on the outgoing request.
//
// ## API Reference
//
// - DigitalOcean API v2: https://docs.digitalocean.com/reference/api/
// - Domains: `/domains`, `/domains/{name}`
// - Records: `/domains/{name}/records`, `/domains/{name}/records/{id}`

use async_trait::async_trait;
use dosync_core::config::{ApiConfig, DEFAULT_API_URL};
use dosync_core::request::{ApiRequest, Method};
use dosync_core::traits::HttpTransport;
use dosync_core::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// DigitalOcean API base URL
pub const DIGITALOCEAN_API_BASE: &str = DEFAULT_API_URL;

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "digitalocean";

/// Error body returned by the API on failure
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP transport for the DigitalOcean API
#[derive(Clone)]
pub struct DigitalOceanTransport {
    /// HTTP client with the configured timeout
    client: reqwest::Client,

    /// Base URL without trailing slash
    base_url: String,

    timeout: Duration,
}

impl std::fmt::Debug for DigitalOceanTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DigitalOceanTransport {
    /// Create a transport for `base_url` with the given timeout
    ///
    /// # Errors
    ///
    /// Fails when the URL has no HTTP(S) scheme or the HTTP client cannot
    /// be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(Error::config(format!(
                "API base URL must use HTTP or HTTPS scheme. Got: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Transport for the public API with the default timeout
    pub fn with_defaults() -> Result<Self> {
        Self::new(DIGITALOCEAN_API_BASE, DEFAULT_HTTP_TIMEOUT)
    }

    /// Transport described by the API section of the configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`
    ///
    /// Paths with a query, a fragment or dot segments are refused.
    fn url(&self, path: &str) -> Result<String> {
        if !path.starts_with('/')
            || path.contains(['?', '#'])
            || path.split('/').any(|segment| segment == "." || segment == "..")
        {
            return Err(Error::validation(format!(
                "Refusing to send request to unsafe path '{}'",
                path
            )));
        }
        Ok(format!("{}{}", self.base_url, path))
    }
}

#[async_trait]
impl HttpTransport for DigitalOceanTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let api_key = request
            .api_key()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::config("No DigitalOcean API key configured"))?;

        let url = self.url(&request.path)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        tracing::debug!(method = %request.method, url = %url, "DigitalOcean API call");

        let mut builder = self
            .client
            .request(method, &url)
            .bearer_auth(api_key)
            .header("Accept", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::http(format!("Request timed out after {:?}: {}", self.timeout, e))
            } else {
                Error::http(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &request.path, &text));
        }

        decode_body(&text)
    }

    fn transport_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Decode a successful response body; empty bodies become `{}`
fn decode_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(text)
        .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
}

/// Map a non-2xx status to an error
fn status_error(status: u16, path: &str, body: &str) -> Error {
    let detail = error_detail(body);

    match status {
        401 | 403 => Error::auth(format!(
            "Authentication failed: invalid API token or insufficient scope. Status: {} - {}",
            status, detail
        )),
        404 => Error::not_found(format!("{}: {}", path, detail)),
        422 => Error::provider(
            PROVIDER,
            format!("Unprocessable request: {}", detail),
        ),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::provider(
            PROVIDER,
            format!("DigitalOcean server error (transient): {} - {}", status, detail),
        ),
        _ => Error::provider(
            PROVIDER,
            format!("Request failed: {} - {}", status, detail),
        ),
    }
}

/// Human-readable part of an error body
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ApiErrorBody { id: Some(id), .. }) => id,
        _ if body.trim().is_empty() => "no response body".to_string(),
        _ => body.trim().to_string(),
    }
}
