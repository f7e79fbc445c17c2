//! Convenience re-exports for common procedure access usage

// Core traits
pub use crate::traits::{DataAccess, NameResolver, OptionalExt, ProcInput, ProcOutput, Record, RowView};

// Derive macro
pub use record_derive::Record;

// Accessors and their settings
pub use crate::accessor::{AccessSettings, DirectDataAccess, MappedDataAccess};
pub use crate::id_type::Identifier;
pub use crate::options::CallOptions;

// Name resolution
pub use crate::resolvers::{ConventionResolver, MapResolver};
pub use crate::traits::{OperationContext, OperationKind, TypeDescriptor};

// Error types
pub use crate::errors::{DataAccessError, FieldMappingError, ResolutionError};

// Ad-hoc inputs
pub use crate::parameters::{ParameterSet, Serialized};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
pub use uuid::Uuid;
