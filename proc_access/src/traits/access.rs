//! Trait definitions
//!
//! This module defines the operation surface shared by every accessor.

use crate::errors::DataAccessError;
use crate::id_type::Identifier;
use crate::options::CallOptions;
use crate::traits::record::{ProcInput, Record};
use async_trait::async_trait;

/// Stored-procedure operations over model types.
///
/// `Target` is how a call names its procedure: an operation tag for the
/// mapped accessor, a literal name for the direct accessor.
#[async_trait]
pub trait DataAccess: Send + Sync {
    type Target: Send + Sync + 'static;

    /// Fetch exactly one row by identifier.
    /// Fails with `NotFound` (carrying the id) when the cursor is empty.
    async fn get_object_by_id<TID, T>(
        &self,
        id: TID,
        target: Self::Target,
        options: CallOptions,
    ) -> Result<T, DataAccessError>
    where
        TID: Identifier,
        T: Record;

    /// Fetch exactly one row, binding every field of `input`.
    /// Fails with `NotFound` (carrying the rendered input) when the cursor is empty.
    async fn get_object_with_parameters<P, T>(
        &self,
        input: &P,
        target: Self::Target,
        options: CallOptions,
    ) -> Result<T, DataAccessError>
    where
        P: ProcInput + Sync + ?Sized,
        T: Record;

    /// Fetch every row. An empty result is not an error.
    async fn get_list<T>(&self, target: Self::Target, options: CallOptions) -> Result<Vec<T>, DataAccessError>
    where
        T: Record;

    /// Fetch every row, binding every field of `input`
    async fn get_list_with_parameters<P, T>(
        &self,
        input: &P,
        target: Self::Target,
        options: CallOptions,
    ) -> Result<Vec<T>, DataAccessError>
    where
        P: ProcInput + Sync + ?Sized,
        T: Record;

    /// Bind every field of `record` plus an identifier output parameter,
    /// and return the generated identifier
    async fn insert<TID, T>(
        &self,
        record: &T,
        target: Self::Target,
        options: CallOptions,
    ) -> Result<TID, DataAccessError>
    where
        TID: Identifier,
        T: Record;

    /// Bind every field of `record` followed by the identifier
    async fn update_by_id<TID, T>(
        &self,
        id: TID,
        record: &T,
        target: Self::Target,
        options: CallOptions,
    ) -> Result<(), DataAccessError>
    where
        TID: Identifier,
        T: Record;

    /// Call a procedure whose only parameter is the identifier
    async fn id_call<TID>(&self, id: TID, target: Self::Target, options: CallOptions) -> Result<(), DataAccessError>
    where
        TID: Identifier;

    /// Same binding as `id_call`; `T` only contributes type context to name resolution
    async fn id_call_for<TID, T>(
        &self,
        id: TID,
        target: Self::Target,
        options: CallOptions,
    ) -> Result<(), DataAccessError>
    where
        TID: Identifier,
        T: Record;

    /// Call a procedure that returns nothing, binding every field of `input`
    async fn parameter_call<P>(&self, input: &P, target: Self::Target, options: CallOptions) -> Result<(), DataAccessError>
    where
        P: ProcInput + Sync + ?Sized;

    /// Call a procedure that takes no parameters and returns nothing
    async fn no_parameter_call(&self, target: Self::Target, options: CallOptions) -> Result<(), DataAccessError>;
}

/// Turns the not-found outcome of a single-row fetch into `Ok(None)`
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, DataAccessError>;
}

impl<T> OptionalExt<T> for Result<T, DataAccessError> {
    fn optional(self) -> Result<Option<T>, DataAccessError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
