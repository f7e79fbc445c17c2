//! Unified value mapping between Rust field types and stored-procedure parameters/columns
//! This crate provides the value model shared by the procbind marshaling engine and its backends

pub mod convert;
pub mod serialize;
pub mod sql;
pub mod types;

pub use convert::{ConversionError, FromProcValue};
pub use serialize::{serialize_to_fields, SerializeError};
pub use sql::{pg_type_for_value, IdWidth};
pub use types::ProcValue;
