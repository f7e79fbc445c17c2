//! Value definitions
//!
//! This module provides the dynamically typed value carried by bound
//! parameters and result columns, plus conversions from Rust types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A single parameter or column value as exchanged with a stored procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcValue {
    Null,
    Bool(bool),
    TinyInt(u8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Uuid(Uuid),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

impl ProcValue {
    /// Name of the variant, used in conversion error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ProcValue::Null => "Null",
            ProcValue::Bool(_) => "Bool",
            ProcValue::TinyInt(_) => "TinyInt",
            ProcValue::SmallInt(_) => "SmallInt",
            ProcValue::Int(_) => "Int",
            ProcValue::BigInt(_) => "BigInt",
            ProcValue::Float(_) => "Float",
            ProcValue::Text(_) => "Text",
            ProcValue::Timestamp(_) => "Timestamp",
            ProcValue::DateTime(_) => "DateTime",
            ProcValue::Date(_) => "Date",
            ProcValue::Uuid(_) => "Uuid",
            ProcValue::Json(_) => "Json",
            ProcValue::Bytes(_) => "Bytes",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ProcValue::Null)
    }

    /// Integer payload widened to i64, if this is an integer variant
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ProcValue::TinyInt(v) => Some(i64::from(*v)),
            ProcValue::SmallInt(v) => Some(i64::from(*v)),
            ProcValue::Int(v) => Some(i64::from(*v)),
            ProcValue::BigInt(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ProcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcValue::Null => Ok(()),
            ProcValue::Bool(v) => write!(f, "{}", v),
            ProcValue::TinyInt(v) => write!(f, "{}", v),
            ProcValue::SmallInt(v) => write!(f, "{}", v),
            ProcValue::Int(v) => write!(f, "{}", v),
            ProcValue::BigInt(v) => write!(f, "{}", v),
            ProcValue::Float(v) => write!(f, "{}", v),
            ProcValue::Text(v) => write!(f, "{}", v),
            ProcValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            ProcValue::DateTime(v) => write!(f, "{}", v),
            ProcValue::Date(v) => write!(f, "{}", v),
            ProcValue::Uuid(v) => write!(f, "{}", v),
            ProcValue::Json(v) => write!(f, "{}", v),
            ProcValue::Bytes(v) => {
                write!(f, "0x")?;
                for byte in v {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for ProcValue {
    fn from(val: bool) -> Self {
        ProcValue::Bool(val)
    }
}

impl From<u8> for ProcValue {
    fn from(val: u8) -> Self {
        ProcValue::TinyInt(val)
    }
}

impl From<i8> for ProcValue {
    fn from(val: i8) -> Self {
        ProcValue::SmallInt(i16::from(val))
    }
}

impl From<i16> for ProcValue {
    fn from(val: i16) -> Self {
        ProcValue::SmallInt(val)
    }
}

impl From<u16> for ProcValue {
    fn from(val: u16) -> Self {
        ProcValue::Int(i32::from(val))
    }
}

impl From<i32> for ProcValue {
    fn from(val: i32) -> Self {
        ProcValue::Int(val)
    }
}

impl From<u32> for ProcValue {
    fn from(val: u32) -> Self {
        ProcValue::BigInt(i64::from(val))
    }
}

impl From<i64> for ProcValue {
    fn from(val: i64) -> Self {
        ProcValue::BigInt(val)
    }
}

impl From<f32> for ProcValue {
    fn from(val: f32) -> Self {
        ProcValue::Float(f64::from(val))
    }
}

impl From<f64> for ProcValue {
    fn from(val: f64) -> Self {
        ProcValue::Float(val)
    }
}

impl From<String> for ProcValue {
    fn from(val: String) -> Self {
        ProcValue::Text(val)
    }
}

impl From<&str> for ProcValue {
    fn from(val: &str) -> Self {
        ProcValue::Text(val.to_string())
    }
}

impl From<DateTime<Utc>> for ProcValue {
    fn from(val: DateTime<Utc>) -> Self {
        ProcValue::Timestamp(val)
    }
}

impl From<NaiveDateTime> for ProcValue {
    fn from(val: NaiveDateTime) -> Self {
        ProcValue::DateTime(val)
    }
}

impl From<NaiveDate> for ProcValue {
    fn from(val: NaiveDate) -> Self {
        ProcValue::Date(val)
    }
}

impl From<Uuid> for ProcValue {
    fn from(val: Uuid) -> Self {
        ProcValue::Uuid(val)
    }
}

impl From<serde_json::Value> for ProcValue {
    fn from(val: serde_json::Value) -> Self {
        ProcValue::Json(val)
    }
}

impl From<Vec<u8>> for ProcValue {
    fn from(val: Vec<u8>) -> Self {
        ProcValue::Bytes(val)
    }
}

impl<T> From<Option<T>> for ProcValue
where
    T: Into<ProcValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => ProcValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_key_rendering() {
        assert_eq!(ProcValue::Int(1).to_string(), "1");
        assert_eq!(ProcValue::Text("String".into()).to_string(), "String");
        assert_eq!(ProcValue::Null.to_string(), "");
        assert_eq!(ProcValue::Bytes(vec![0x0a, 0xff]).to_string(), "0x0AFF");

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(ProcValue::Date(date).to_string(), "2024-01-01");
    }

    #[test]
    fn test_integer_sources_keep_their_width() {
        assert_eq!(ProcValue::from(7u8), ProcValue::TinyInt(7));
        assert_eq!(ProcValue::from(-7i8), ProcValue::SmallInt(-7));
        assert_eq!(ProcValue::from(7i16), ProcValue::SmallInt(7));
        assert_eq!(ProcValue::from(u16::MAX), ProcValue::Int(65535));
        assert_eq!(ProcValue::from(u32::MAX), ProcValue::BigInt(4_294_967_295));
        assert_eq!(ProcValue::from(7i64), ProcValue::BigInt(7));
    }

    #[test]
    fn test_option_maps_none_to_null() {
        assert_eq!(ProcValue::from(None::<i32>), ProcValue::Null);
        assert_eq!(ProcValue::from(Some("x")), ProcValue::Text("x".into()));
    }

    #[test]
    fn test_as_i64_only_for_integers() {
        assert_eq!(ProcValue::TinyInt(3).as_i64(), Some(3));
        assert_eq!(ProcValue::BigInt(-3).as_i64(), Some(-3));
        assert_eq!(ProcValue::Float(3.0).as_i64(), None);
        assert_eq!(ProcValue::Null.as_i64(), None);
    }
}
