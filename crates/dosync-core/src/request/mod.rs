// # API Request Builders
//
// One builder per DigitalOcean DNS operation. A builder only describes the
// call (method, path, query, body); it never performs I/O. The service turns
// it into an [`ApiRequest`], attaches the credential and hands it to the
// transport.
//
// ## Usage
//
// ```rust
// use dosync_core::request::{CreateRecordRequest, Endpoint};
//
// let request = CreateRecordRequest::new("example.com", "MX", "@", "mail.example.com.")
//     .with_priority(10);
//
// let mut api_request = request.to_request();
// api_request.set_api_key("token");
// assert_eq!(api_request.path, "/domains/example.com/records");
// ```

pub mod domain;
pub mod record;

pub use domain::{CreateDomainRequest, DeleteDomainRequest, GetDomainRequest, ListDomainsRequest};
pub use record::{
    CreateRecordRequest, DeleteRecordRequest, GetRecordRequest, ListRecordsRequest,
    RecordFields, UpdateRecordRequest,
};

use serde_json::Value;

use crate::error::{Error, Result};

/// Default page for list operations
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for list operations
pub const DEFAULT_PER_PAGE: u32 = 20;

/// HTTP method of an API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of one API operation
pub trait Endpoint {
    /// HTTP method
    fn method(&self) -> Method;

    /// Check the arguments before anything is sent
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Path relative to the API base URL, e.g. `/domains/example.com`
    fn path(&self) -> String;

    /// Query parameters
    fn query(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// JSON body
    fn body(&self) -> Option<Value> {
        None
    }

    /// Build the transport-level descriptor (without a credential)
    fn to_request(&self) -> ApiRequest {
        ApiRequest {
            method: self.method(),
            path: self.path(),
            query: self.query(),
            body: self.body(),
            api_key: None,
        }
    }
}

/// A fully described API call, ready for an [`HttpTransport`](crate::traits::HttpTransport)
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    api_key: Option<String>,
}

impl ApiRequest {
    /// Attach the API credential. No format checks are done here.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    /// The attached credential, if any
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

/// A domain name as a single percent-encoded path segment
fn domain_segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Reject names that cannot address a single domain: empty, `.` or `..`
/// (dot segments survive encoding and are resolved away by URL parsing)
fn check_domain_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::validation(format!("Invalid domain name '{}'", name)));
    }
    Ok(())
}

fn page_query(page: u32, per_page: u32) -> Vec<(String, String)> {
    vec![
        ("page".to_string(), page.to_string()),
        ("per_page".to_string(), per_page.to_string()),
    ]
}
