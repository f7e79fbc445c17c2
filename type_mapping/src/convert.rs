//! Conversions from column values back into Rust field types
//!
//! Integer targets accept any integer variant whose value fits. Every other
//! target accepts its own variant, plus the few lossless cross-variant cases
//! listed on each impl.

use crate::types::ProcValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A column value that cannot be stored into the requested Rust type
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected {expected}, found {found}")]
pub struct ConversionError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl ConversionError {
    pub fn new(expected: &'static str, value: &ProcValue) -> Self {
        Self {
            expected,
            found: value.type_name(),
        }
    }
}

/// Trait for Rust types that can be populated from a `ProcValue`
pub trait FromProcValue: Sized {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError>;
}

macro_rules! integer_from_proc_value {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromProcValue for $ty {
                fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
                    value
                        .as_i64()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| ConversionError::new($name, &value))
                }
            }
        )*
    };
}

integer_from_proc_value! {
    u8 => "u8",
    i8 => "i8",
    i16 => "i16",
    u16 => "u16",
    i32 => "i32",
    u32 => "u32",
    i64 => "i64",
}

impl FromProcValue for bool {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Bool(v) => Ok(v),
            ProcValue::TinyInt(v) if v <= 1 => Ok(v == 1),
            other => Err(ConversionError::new("bool", &other)),
        }
    }
}

impl FromProcValue for f64 {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Float(v) => Ok(v),
            ProcValue::TinyInt(v) => Ok(f64::from(v)),
            ProcValue::SmallInt(v) => Ok(f64::from(v)),
            ProcValue::Int(v) => Ok(f64::from(v)),
            other => Err(ConversionError::new("f64", &other)),
        }
    }
}

impl FromProcValue for f32 {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Float(v) => Ok(v as f32),
            ProcValue::TinyInt(v) => Ok(f32::from(v)),
            ProcValue::SmallInt(v) => Ok(f32::from(v)),
            other => Err(ConversionError::new("f32", &other)),
        }
    }
}

impl FromProcValue for String {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Text(v) => Ok(v),
            other => Err(ConversionError::new("String", &other)),
        }
    }
}

/// Also accepts a `DateTime` column, read as UTC
impl FromProcValue for DateTime<Utc> {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Timestamp(v) => Ok(v),
            ProcValue::DateTime(v) => Ok(v.and_utc()),
            other => Err(ConversionError::new("DateTime<Utc>", &other)),
        }
    }
}

/// Also accepts a `Timestamp` column, dropping the zone
impl FromProcValue for NaiveDateTime {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::DateTime(v) => Ok(v),
            ProcValue::Timestamp(v) => Ok(v.naive_utc()),
            other => Err(ConversionError::new("NaiveDateTime", &other)),
        }
    }
}

impl FromProcValue for NaiveDate {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Date(v) => Ok(v),
            other => Err(ConversionError::new("NaiveDate", &other)),
        }
    }
}

impl FromProcValue for Uuid {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Uuid(v) => Ok(v),
            ProcValue::Text(ref s) => Uuid::parse_str(s).map_err(|_| ConversionError::new("Uuid", &value)),
            other => Err(ConversionError::new("Uuid", &other)),
        }
    }
}

impl FromProcValue for serde_json::Value {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Json(v) => Ok(v),
            other => Err(ConversionError::new("serde_json::Value", &other)),
        }
    }
}

impl FromProcValue for Vec<u8> {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Bytes(v) => Ok(v),
            other => Err(ConversionError::new("Vec<u8>", &other)),
        }
    }
}

impl<T: FromProcValue> FromProcValue for Option<T> {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        match value {
            ProcValue::Null => Ok(None),
            other => T::from_proc_value(other).map(Some),
        }
    }
}

impl FromProcValue for ProcValue {
    fn from_proc_value(value: ProcValue) -> Result<Self, ConversionError> {
        Ok(value)
    }
}
