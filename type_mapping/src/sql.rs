//! SQL type utilities
//!
//! This module holds the identifier-width table used for output
//! identifier parameters and the PostgreSQL type names for casts.

use crate::types::ProcValue;

/// Database width of an identifier output parameter.
///
/// Closed set: byte, short, int and long identifiers. Anything else is
/// treated as `Int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdWidth {
    TinyInt,
    SmallInt,
    #[default]
    Int,
    BigInt,
}

impl IdWidth {
    /// Storage size in bytes
    pub fn bytes(self) -> usize {
        match self {
            IdWidth::TinyInt => 1,
            IdWidth::SmallInt => 2,
            IdWidth::Int => 4,
            IdWidth::BigInt => 8,
        }
    }

    /// PostgreSQL type used when declaring the parameter.
    /// PostgreSQL has no 1-byte integer, so `TinyInt` is carried as SMALLINT.
    pub fn pg_type(self) -> &'static str {
        match self {
            IdWidth::TinyInt | IdWidth::SmallInt => "SMALLINT",
            IdWidth::Int => "INTEGER",
            IdWidth::BigInt => "BIGINT",
        }
    }
}

/// PostgreSQL type name for a value, used when a bound value needs an explicit cast
pub fn pg_type_for_value(value: &ProcValue) -> Option<&'static str> {
    match value {
        ProcValue::Null => None,
        ProcValue::Bool(_) => Some("BOOLEAN"),
        ProcValue::TinyInt(_) | ProcValue::SmallInt(_) => Some("SMALLINT"),
        ProcValue::Int(_) => Some("INTEGER"),
        ProcValue::BigInt(_) => Some("BIGINT"),
        ProcValue::Float(_) => Some("DOUBLE PRECISION"),
        ProcValue::Text(_) => Some("VARCHAR"),
        ProcValue::Timestamp(_) => Some("TIMESTAMP WITH TIME ZONE"),
        ProcValue::DateTime(_) => Some("TIMESTAMP"),
        ProcValue::Date(_) => Some("DATE"),
        ProcValue::Uuid(_) => Some("UUID"),
        ProcValue::Json(_) => Some("JSONB"),
        ProcValue::Bytes(_) => Some("BYTEA"),
    }
}
