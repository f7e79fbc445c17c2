//! Proc Access - stored-procedure data access core for ProcBind
//!
//! This crate provides the call pipeline shared by the mapped and direct
//! accessors: model descriptors, parameter binding, row materialization,
//! procedure name resolution and the error kinds a call can surface.

// Generated `#[derive(Record)]` code refers to `proc_access::...`
extern crate self as proc_access;

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod accessor;
pub mod errors;
pub mod id_type;
pub mod marshal;
pub mod options;
pub mod parameters;
pub mod prelude;
pub mod resolvers;
pub mod traits;
pub mod validation;

pub use accessor::{AccessSettings, DirectDataAccess, MappedDataAccess};
pub use errors::{DataAccessError, FieldMappingError, ResolutionError, TransportError};
pub use id_type::Identifier;
pub use options::CallOptions;
pub use parameters::{ParameterSet, Serialized};
pub use resolvers::{ConventionResolver, MapResolver};
pub use traits::*;
pub use validation::{ProcedureName, ValidationError};

pub use record_derive::Record;

// Value types used by generated code and backends
pub use type_mapping::{ConversionError, FromProcValue, IdWidth, ProcValue};
