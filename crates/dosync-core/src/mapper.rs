//! Mapping of remote record payloads onto [`DomainRecord`]
//!
//! Only keys present in the payload are written; an absent key leaves the
//! stored value as it was. Incremental sync relies on this.
//!
//! | key | coercion |
//! |---|---|
//! | `type`, `name`, `data` | string, anything else becomes `""` |
//! | `priority`, `port`, `ttl`, `weight` | integer if numeric and within `i64`, otherwise `None` |
//! | `flags`, `tag` | string, otherwise `None` |

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::DomainRecord;

/// Copies remote record payloads onto local records
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMapper;

impl RecordMapper {
    /// Merge `payload` into `record`.
    ///
    /// `domain_name` always overwrites the record's domain. The payload must
    /// carry a numeric `id`; when it does not, the record is left untouched
    /// and a validation error is returned.
    pub fn apply(
        record: &mut DomainRecord,
        payload: &Map<String, Value>,
        domain_name: &str,
    ) -> Result<()> {
        let record_id = Self::record_id(payload)?;

        record.record_id = record_id;
        record.domain_name = domain_name.to_string();

        if let Some(value) = payload.get("type") {
            record.record_type = text(value);
        }
        if let Some(value) = payload.get("name") {
            record.name = text(value);
        }
        if let Some(value) = payload.get("data") {
            record.data = text(value);
        }
        if let Some(value) = payload.get("priority") {
            record.priority = numeric(value);
        }
        if let Some(value) = payload.get("port") {
            record.port = numeric(value);
        }
        if let Some(value) = payload.get("ttl") {
            record.ttl = numeric(value);
        }
        if let Some(value) = payload.get("weight") {
            record.weight = numeric(value);
        }
        if let Some(value) = payload.get("flags") {
            record.flags = optional_text(value);
        }
        if let Some(value) = payload.get("tag") {
            record.tag = optional_text(value);
        }

        Ok(())
    }

    /// Extract the remote identifier, truncating fractional values toward zero.
    /// Identifiers that do not fit in an `i64` are rejected.
    pub fn record_id(payload: &Map<String, Value>) -> Result<i64> {
        let id = payload
            .get("id")
            .ok_or_else(|| Error::validation("Record payload has no 'id'"))?;

        numeric(id).ok_or_else(|| {
            Error::validation(format!(
                "Record id must be a numeric value within the 64-bit range, got {}",
                id
            ))
        })
    }
}

fn text(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn optional_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Interpret a JSON value as an integer: numbers and numeric strings only.
/// Values outside the `i64` range yield None rather than saturating.
fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) if number.is_i64() => number.as_i64(),
        Value::Number(number) if number.is_u64() => None,
        Value::Number(number) => number.as_f64().and_then(truncate),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

/// Truncate toward zero when the result fits in an `i64`
fn truncate(value: f64) -> Option<i64> {
    // 2^63 is exactly representable, i64::MAX is not
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    let whole = value.trunc();
    (value.is_finite() && whole >= -UPPER && whole < UPPER).then_some(whole as i64)
}
