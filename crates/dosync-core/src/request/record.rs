//! Record endpoints: `/domains/{name}/records[/{id}]`

use serde::Serialize;
use serde_json::Value;

use super::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, Endpoint, Method, check_domain_name, domain_segment,
    page_query,
};
use crate::error::Result;

/// Body shared by record create and update.
///
/// Optional fields left as `None` are omitted from the JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFields {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl RecordFields {
    pub fn new(
        record_type: impl Into<String>,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            data: data.into(),
            priority: None,
            port: None,
            ttl: None,
            weight: None,
            flags: None,
            tag: None,
        }
    }

    fn to_body(&self) -> Value {
        // Plain strings and integers cannot fail to serialize
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Generates the optional-field setters shared by create and update builders
macro_rules! optional_field_setters {
    () => {
        pub fn with_priority(mut self, priority: i64) -> Self {
            self.fields.priority = Some(priority);
            self
        }

        pub fn with_port(mut self, port: i64) -> Self {
            self.fields.port = Some(port);
            self
        }

        pub fn with_ttl(mut self, ttl: i64) -> Self {
            self.fields.ttl = Some(ttl);
            self
        }

        pub fn with_weight(mut self, weight: i64) -> Self {
            self.fields.weight = Some(weight);
            self
        }

        pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
            self.fields.flags = Some(flags.into());
            self
        }

        pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
            self.fields.tag = Some(tag.into());
            self
        }

        /// Replace all record fields at once
        pub fn with_fields(mut self, fields: RecordFields) -> Self {
            self.fields = fields;
            self
        }
    };
}

/// `GET /domains/{name}/records?page=..&per_page=..`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRecordsRequest {
    pub domain_name: String,
    pub page: u32,
    pub per_page: u32,
}

impl ListRecordsRequest {
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }
}

impl Endpoint for ListRecordsRequest {
    fn validate(&self) -> Result<()> {
        check_domain_name(&self.domain_name)
    }

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("/domains/{}/records", domain_segment(&self.domain_name))
    }

    fn query(&self) -> Vec<(String, String)> {
        page_query(self.page, self.per_page)
    }
}

/// `GET /domains/{name}/records/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRecordRequest {
    pub domain_name: String,
    pub record_id: i64,
}

impl GetRecordRequest {
    pub fn new(domain_name: impl Into<String>, record_id: i64) -> Self {
        Self {
            domain_name: domain_name.into(),
            record_id,
        }
    }
}

impl Endpoint for GetRecordRequest {
    fn validate(&self) -> Result<()> {
        check_domain_name(&self.domain_name)
    }

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!(
            "/domains/{}/records/{}",
            domain_segment(&self.domain_name),
            self.record_id
        )
    }
}

/// `POST /domains/{name}/records`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecordRequest {
    pub domain_name: String,
    pub fields: RecordFields,
}

impl CreateRecordRequest {
    pub fn new(
        domain_name: impl Into<String>,
        record_type: impl Into<String>,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            fields: RecordFields::new(record_type, name, data),
        }
    }

    optional_field_setters!();
}

impl Endpoint for CreateRecordRequest {
    fn validate(&self) -> Result<()> {
        check_domain_name(&self.domain_name)
    }

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        format!("/domains/{}/records", domain_segment(&self.domain_name))
    }

    fn body(&self) -> Option<Value> {
        Some(self.fields.to_body())
    }
}

/// `PUT /domains/{name}/records/{id}`
///
/// DigitalOcean expects type, name and data on every update, so they are
/// constructor arguments here as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecordRequest {
    pub domain_name: String,
    pub record_id: i64,
    pub fields: RecordFields,
}

impl UpdateRecordRequest {
    pub fn new(
        domain_name: impl Into<String>,
        record_id: i64,
        record_type: impl Into<String>,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            record_id,
            fields: RecordFields::new(record_type, name, data),
        }
    }

    optional_field_setters!();
}

impl Endpoint for UpdateRecordRequest {
    fn validate(&self) -> Result<()> {
        check_domain_name(&self.domain_name)
    }

    fn method(&self) -> Method {
        Method::Put
    }

    fn path(&self) -> String {
        format!(
            "/domains/{}/records/{}",
            domain_segment(&self.domain_name),
            self.record_id
        )
    }

    fn body(&self) -> Option<Value> {
        Some(self.fields.to_body())
    }
}

/// `DELETE /domains/{name}/records/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecordRequest {
    pub domain_name: String,
    pub record_id: i64,
}

impl DeleteRecordRequest {
    pub fn new(domain_name: impl Into<String>, record_id: i64) -> Self {
        Self {
            domain_name: domain_name.into(),
            record_id,
        }
    }
}

impl Endpoint for DeleteRecordRequest {
    fn validate(&self) -> Result<()> {
        check_domain_name(&self.domain_name)
    }

    fn method(&self) -> Method {
        Method::Delete
    }

    fn path(&self) -> String {
        format!(
            "/domains/{}/records/{}",
            domain_segment(&self.domain_name),
            self.record_id
        )
    }
}
