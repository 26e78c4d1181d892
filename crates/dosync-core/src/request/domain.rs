//! Domain endpoints: `/domains` and `/domains/{name}`

use serde_json::{Map, Value};

use super::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, Endpoint, Method, check_domain_name, domain_segment,
    page_query,
};
use crate::error::Result;

/// `GET /domains?page=..&per_page=..`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDomainsRequest {
    pub page: u32,
    pub per_page: u32,
}

impl ListDomainsRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

impl Default for ListDomainsRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }
}

impl Endpoint for ListDomainsRequest {
    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        "/domains".to_string()
    }

    fn query(&self) -> Vec<(String, String)> {
        page_query(self.page, self.per_page)
    }
}

/// `GET /domains/{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDomainRequest {
    pub name: String,
}

impl GetDomainRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Endpoint for GetDomainRequest {
    fn validate(&self) -> Result<()> {
        check_domain_name(&self.name)
    }

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("/domains/{}", domain_segment(&self.name))
    }
}

/// `POST /domains` with `{"name": .., "ip_address": ..}`
///
/// When `ip_address` is given, DigitalOcean creates an apex A record
/// pointing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDomainRequest {
    pub name: String,
    pub ip_address: Option<String>,
}

impl CreateDomainRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip_address: None,
        }
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }
}

impl Endpoint for CreateDomainRequest {
    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        "/domains".to_string()
    }

    fn body(&self) -> Option<Value> {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(ref ip_address) = self.ip_address {
            body.insert("ip_address".to_string(), Value::String(ip_address.clone()));
        }
        Some(Value::Object(body))
    }
}

/// `DELETE /domains/{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDomainRequest {
    pub name: String,
}

impl DeleteDomainRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Endpoint for DeleteDomainRequest {
    fn validate(&self) -> Result<()> {
        check_domain_name(&self.name)
    }

    fn method(&self) -> Method {
        Method::Delete
    }

    fn path(&self) -> String {
        format!("/domains/{}", domain_segment(&self.name))
    }
}
