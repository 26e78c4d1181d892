//! Locally stored entities
//!
//! [`Domain`] and [`DomainRecord`] are independent rows. A record refers to
//! its zone only through the denormalized `domain_name` string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A DNS zone tracked locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Storage-assigned identifier (None until first commit)
    pub id: Option<i64>,
    /// Zone name, e.g. "example.com"
    pub name: String,
    /// TTL as reported by the API, kept as free-form text
    pub ttl: Option<String>,
    /// Zone file contents
    pub zone_file: Option<String>,
    /// Set by the store when the row is first committed
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the store on every commit touching the row
    pub updated_at: Option<DateTime<Utc>>,
}

impl Domain {
    /// Create a new, not yet persisted domain
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            ttl: None,
            zone_file: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Check required fields before persisting
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::validation("Domain name cannot be empty"));
        }
        Ok(())
    }
}

/// A single DNS resource record under a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Storage-assigned identifier (None until first commit)
    pub id: Option<i64>,
    /// Name of the owning zone (denormalized, not a reference)
    pub domain_name: String,
    /// Identifier assigned by the remote API
    pub record_id: i64,
    /// A, AAAA, CNAME, MX, TXT, NS, SRV, CAA, ...
    pub record_type: String,
    /// Host name, "@" for the zone apex
    pub name: String,
    /// Record value
    pub data: String,
    /// MX/SRV priority
    pub priority: Option<i64>,
    /// SRV port
    pub port: Option<i64>,
    pub ttl: Option<i64>,
    /// SRV weight
    pub weight: Option<i64>,
    /// CAA flags
    pub flags: Option<String>,
    /// CAA tag
    pub tag: Option<String>,
    /// Weak link to the owning account; cleared when that account is removed.
    /// Only set by embedding applications, sync preserves it.
    #[serde(default)]
    pub account_id: Option<i64>,
}

impl DomainRecord {
    /// Create an empty record keyed by its natural key
    pub fn new(domain_name: impl Into<String>, record_id: i64) -> Self {
        Self {
            id: None,
            domain_name: domain_name.into(),
            record_id,
            record_type: String::new(),
            name: String::new(),
            data: String::new(),
            priority: None,
            port: None,
            ttl: None,
            weight: None,
            flags: None,
            tag: None,
            account_id: None,
        }
    }

    /// Natural key used for upsert matching
    pub fn key(&self) -> (String, i64) {
        (self.domain_name.clone(), self.record_id)
    }

    /// Check required fields before persisting
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("domain_name", &self.domain_name),
            ("type", &self.record_type),
            ("name", &self.name),
            ("data", &self.data),
        ];

        for (field, value) in required {
            if value.is_empty() {
                return Err(Error::validation(format!(
                    "Record {} of {} has an empty '{}' field",
                    self.record_id, self.domain_name, field
                )));
            }
        }

        Ok(())
    }
}
