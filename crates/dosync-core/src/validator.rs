//! Response shape validation
//!
//! The DigitalOcean API answers list calls with
//! `{"domains": [...], "meta": {...}, "links": {...}}` (or `domain_records`).
//! [`ResponseValidator`] checks that each expected member has a container
//! type and normalizes it so callers always see string-keyed objects:
//! nested JSON arrays become objects keyed `"0"`, `"1"`, ...
//!
//! A missing or null member is treated as empty. Any other scalar is a
//! validation error naming the member.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Normalized list response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResponse {
    /// Entries of the list member, each normalized to an object
    pub items: Vec<Map<String, Value>>,
    pub meta: Map<String, Value>,
    pub links: Map<String, Value>,
}

impl ListResponse {
    /// `meta.total` when the API reported it
    pub fn total(&self) -> Option<u64> {
        self.meta.get("total").and_then(Value::as_u64)
    }
}

/// Stateless validator for decoded API responses
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator;

impl ResponseValidator {
    /// Validate a `GET /domains` response
    pub fn validate_domain_list(response: &Value) -> Result<ListResponse> {
        Self::validate_list(response, "domains")
    }

    /// Validate a `GET /domains/{name}/records` response
    pub fn validate_record_list(response: &Value) -> Result<ListResponse> {
        Self::validate_list(response, "domain_records")
    }

    /// Validate a single-domain response and return its `domain` object
    pub fn validate_domain(response: &Value) -> Result<Map<String, Value>> {
        Self::validate_single(response, "domain")
    }

    /// Validate a single-record response and return its `domain_record` object
    pub fn validate_record(response: &Value) -> Result<Map<String, Value>> {
        Self::validate_single(response, "domain_record")
    }

    fn validate_list(response: &Value, list_key: &str) -> Result<ListResponse> {
        let root = Self::root_object(response)?;

        let list = Self::container(root, list_key)?;
        let meta = Self::container(root, "meta")?;
        let links = Self::container(root, "links")?;

        let items = match list {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| Self::entry(entry, list_key, index))
                .collect::<Result<Vec<_>>>()?,
            Some(Value::Object(entries)) => entries
                .values()
                .enumerate()
                .map(|(index, entry)| Self::entry(entry, list_key, index))
                .collect::<Result<Vec<_>>>()?,
            _ => Vec::new(),
        };

        Ok(ListResponse {
            items,
            meta: meta.map(stringify_keys).unwrap_or_default(),
            links: links.map(stringify_keys).unwrap_or_default(),
        })
    }

    fn validate_single(response: &Value, key: &str) -> Result<Map<String, Value>> {
        let root = Self::root_object(response)?;
        Ok(Self::container(root, key)?
            .map(stringify_keys)
            .unwrap_or_default())
    }

    fn root_object(response: &Value) -> Result<&Map<String, Value>> {
        response
            .as_object()
            .ok_or_else(|| Error::validation("Invalid response: top level is not an object"))
    }

    /// Fetch a member that must be an array or object. Absent/null yields None.
    fn container<'a>(root: &'a Map<String, Value>, key: &str) -> Result<Option<&'a Value>> {
        match root.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value @ (Value::Array(_) | Value::Object(_))) => Ok(Some(value)),
            Some(_) => Err(Error::validation(format!(
                "Invalid '{}' field in response",
                key
            ))),
        }
    }

    fn entry(entry: &Value, list_key: &str, index: usize) -> Result<Map<String, Value>> {
        match entry {
            Value::Array(_) | Value::Object(_) => Ok(stringify_keys(entry)),
            _ => Err(Error::validation(format!(
                "Invalid entry '{}[{}]' in response",
                list_key, index
            ))),
        }
    }
}

/// Convert a container into a string-keyed object, recursing into children
fn stringify_keys(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| (key.clone(), normalize(child)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, child)| (index.to_string(), normalize(child)))
            .collect(),
        _ => Map::new(),
    }
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) => Value::Object(stringify_keys(value)),
        scalar => scalar.clone(),
    }
}
