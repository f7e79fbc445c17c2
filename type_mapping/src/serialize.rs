//! Serialization utilities
//!
//! This module extracts the top-level fields of any serde-serializable value
//! as named `ProcValue`s, for callers that bind ad-hoc input objects.

use crate::types::ProcValue;
use serde::Serialize;
use thiserror::Error;

/// A value that cannot be bound as an input object
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    #[error("input must serialize to a struct or map, found {0}")]
    NotAnObject(&'static str),

    #[error("input failed to serialize: {0}")]
    Serialization(String),

    #[error("field {field} holds {value}, which exceeds the BIGINT range")]
    OutOfRange { field: String, value: String },
}

/// Convert serializable data to ordered `(field, value)` pairs.
///
/// Fields keep their serialization order (declaration order for derived
/// structs). Values are taken as serde produces them: strings bind as text,
/// integers as Int or BigInt by range, floats as Float, nested values as Json.
pub fn serialize_to_fields<T: Serialize + ?Sized>(
    data: &T,
) -> Result<Vec<(String, ProcValue)>, SerializeError> {
    let map = match serde_json::to_value(data) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(other) => return Err(SerializeError::NotAnObject(json_kind(&other))),
        Err(e) => return Err(SerializeError::Serialization(e.to_string())),
    };

    map.into_iter()
        .map(|(key, value)| {
            let proc_value = match value {
                serde_json::Value::String(s) => ProcValue::Text(s),
                serde_json::Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        match i32::try_from(i) {
                            Ok(small) => ProcValue::Int(small),
                            Err(_) => ProcValue::BigInt(i),
                        }
                    } else if n.is_u64() {
                        return Err(SerializeError::OutOfRange {
                            field: key,
                            value: n.to_string(),
                        });
                    } else if let Some(f) = n.as_f64() {
                        ProcValue::Float(f)
                    } else {
                        ProcValue::Json(serde_json::Value::Number(n))
                    }
                }
                serde_json::Value::Bool(b) => ProcValue::Bool(b),
                serde_json::Value::Null => ProcValue::Null,
                other => ProcValue::Json(other),
            };
            Ok((key, proc_value))
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a sequence",
        serde_json::Value::Object(_) => "an object",
    }
}
