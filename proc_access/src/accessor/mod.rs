//! Procedure accessors
//!
//! `MappedDataAccess` and `DirectDataAccess` differ only in how a call gets its
//! procedure name. Binding, execution and materialization go through the same
//! call engine.

pub mod core;
pub mod direct;
pub mod mapped;

pub use self::core::AccessSettings;
pub use direct::DirectDataAccess;
pub use mapped::MappedDataAccess;
