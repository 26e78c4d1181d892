//! Table rendering for command output

use dosync_core::{Domain, DomainRecord};
use serde_json::{Map, Value};
use tabled::{Table, Tabled, settings::Style};

#[derive(Debug, Tabled)]
pub struct DomainRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "TTL")]
    ttl: String,
    #[tabled(rename = "Zone file")]
    zone_file: String,
}

impl From<&Map<String, Value>> for DomainRow {
    fn from(payload: &Map<String, Value>) -> Self {
        Self {
            name: cell(payload, "name"),
            ttl: cell(payload, "ttl"),
            zone_file: summarize(&cell(payload, "zone_file")),
        }
    }
}

impl From<&Domain> for DomainRow {
    fn from(domain: &Domain) -> Self {
        Self {
            name: domain.name.clone(),
            ttl: domain.ttl.clone().unwrap_or_default(),
            zone_file: summarize(domain.zone_file.as_deref().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Data")]
    data: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "TTL")]
    ttl: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

impl From<&Map<String, Value>> for RecordRow {
    fn from(payload: &Map<String, Value>) -> Self {
        Self {
            id: cell(payload, "id"),
            record_type: cell(payload, "type"),
            name: cell(payload, "name"),
            data: cell(payload, "data"),
            priority: cell(payload, "priority"),
            port: cell(payload, "port"),
            ttl: cell(payload, "ttl"),
            weight: cell(payload, "weight"),
        }
    }
}

impl From<&DomainRecord> for RecordRow {
    fn from(record: &DomainRecord) -> Self {
        let number = |value: Option<i64>| value.map(|n| n.to_string()).unwrap_or_default();
        Self {
            id: record.record_id.to_string(),
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            data: record.data.clone(),
            priority: number(record.priority),
            port: number(record.port),
            ttl: number(record.ttl),
            weight: number(record.weight),
        }
    }
}

/// Render rows as a table, or a short note when there are none
pub fn render_table<R: Tabled>(rows: &[R], empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Key/value view of a single payload, keys in API order
pub fn render_detail(payload: &Map<String, Value>) -> String {
    if payload.is_empty() {
        return "(empty response)".to_string();
    }

    let width = payload.keys().map(String::len).max().unwrap_or(0);
    payload
        .iter()
        .map(|(key, value)| format!("{:width$}  {}", key, display(value), width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell(payload: &Map<String, Value>, key: &str) -> String {
    payload.get(key).map(display).unwrap_or_default()
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// First line of a zone file
fn summarize(zone_file: &str) -> String {
    match zone_file.lines().next() {
        Some(first) if zone_file.lines().nth(1).is_some() => format!("{} ...", first),
        Some(first) => first.to_string(),
        None => String::new(),
    }
}
