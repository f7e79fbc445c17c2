//! Ad-hoc input objects
//!
//! Not every procedure input deserves a model type. `ParameterSet` builds an
//! ordered list of named values by hand, and `Serialized` binds the top-level
//! fields of any serde-serializable value.

use crate::errors::DataAccessError;
use crate::traits::record::{FieldValue, ProcInput};
use serde::Serialize;
use std::borrow::Cow;
use type_mapping::{serialize_to_fields, ProcValue};

/// Named input values in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: Vec<FieldValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value; a repeated name replaces the earlier value in place
    pub fn with_value(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ProcValue>) -> Self {
        let field = FieldValue::new(name, value);
        match self
            .values
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&field.name))
        {
            Some(existing) => existing.value = field.value,
            None => self.values.push(field),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ProcInput for ParameterSet {
    fn fields(&self) -> Vec<FieldValue> {
        self.values.clone()
    }
}

/// The top-level fields of a serializable value, extracted up front.
///
/// Fields keep serialization order (declaration order for derived structs).
/// A value that is not a struct or map, or that fails to serialize, is
/// rejected here so no call is attempted with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Serialized {
    values: Vec<FieldValue>,
}

impl Serialized {
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Result<Self, DataAccessError> {
        let values = serialize_to_fields(value)?
            .into_iter()
            .map(|(name, value)| FieldValue::new(name, value))
            .collect();
        Ok(Self { values })
    }
}

impl ProcInput for Serialized {
    fn fields(&self) -> Vec<FieldValue> {
        self.values.clone()
    }
}
