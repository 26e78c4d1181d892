// # HTTP Transport Trait
//
// Defines the interface for sending API requests to the DNS provider.
//
// ## Implementations
//
// - DigitalOcean: `dosync-provider-digitalocean` crate
//
// ## Usage
//
// ```rust,ignore
// use dosync_core::request::{Endpoint, GetDomainRequest};
// use dosync_core::HttpTransport;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let transport = /* HttpTransport implementation */;
//
//     let mut request = GetDomainRequest::new("example.com").to_request();
//     request.set_api_key("token");
//     let response = transport.send(&request).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde_json::Value;

use crate::request::ApiRequest;

/// Trait for HTTP transport implementations
///
/// A transport turns one [`ApiRequest`] into one HTTP call and returns the
/// decoded JSON body.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Allowed
/// - Perform HTTP/HTTPS calls to the provider endpoint only
/// - Map HTTP status codes to [`crate::Error`] variants
///
/// # Forbidden
/// - Retry or back off (the core never retries; callers decide)
/// - Access the local store
/// - Log the API credential
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and decode the response body
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: The decoded JSON body. An empty body yields an empty object.
    /// - `Err(Error)`: Network failure, non-2xx status, or undecodable body
    async fn send(&self, request: &ApiRequest) -> Result<Value, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}

/// Source of the API credential
pub trait CredentialProvider: Send + Sync {
    /// The current API key, or `None` when none is configured
    fn api_key(&self) -> Option<String>;
}

/// Credential fixed at construction time (e.g. from the environment)
#[derive(Clone, Default)]
pub struct StaticCredential {
    api_key: Option<String>,
}

impl StaticCredential {
    /// An empty key is treated as "not configured"
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            api_key: (!api_key.is_empty()).then_some(api_key),
        }
    }

    /// A provider with no credential
    pub fn none() -> Self {
        Self { api_key: None }
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredential")
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}
