//! Traits for procedure calls
//!
//! This module contains the traits that define the model descriptors, the
//! call capability consumed from a backend, name resolution, and the
//! operation surface exposed to callers.

pub mod access;
pub mod connection;
pub mod record;
pub mod resolver;

// Re-export all public items for convenience
pub use access::{DataAccess, OptionalExt};
pub use connection::{Command, Connection, Connector, Cursor, Direction, Parameter};
pub use record::{FieldValue, ProcInput, ProcOutput, Record, RowView, TypeDescriptor};
pub use resolver::{NameResolver, OperationContext, OperationKind};
