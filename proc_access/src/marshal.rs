//! Parameter binding and row materialization
//!
//! Input objects become one input parameter per field, named with the
//! configured prefix. Result rows become model instances through
//! `ProcOutput::materialize`.

use crate::errors::{DataAccessError, FieldMappingError};
use crate::id_type::Identifier;
use crate::traits::connection::{Command, Cursor, Parameter};
use crate::traits::record::{FieldValue, ProcInput, Record, RowView};
use std::collections::HashMap;
use type_mapping::{FromProcValue, ProcValue};

/// Input parameters for every field of `input`, in declaration order
pub fn bind_inputs<P: ProcInput + ?Sized>(input: &P, prefix: &str) -> Vec<Parameter> {
    input
        .fields()
        .into_iter()
        .map(|field| Parameter::input(format!("{}{}", prefix, field.name), field.value))
        .collect()
}

/// The identifier input parameter used by by-id calls
pub fn id_parameter<TID: Identifier>(id: TID, prefix: &str, id_name: &str) -> Parameter {
    Parameter::input(format!("{}{}", prefix, id_name), id)
}

/// The output parameter an insert returns its generated identifier through
pub fn id_output_parameter<TID: Identifier>(prefix: &str, id_name: &str) -> Parameter {
    Parameter::output(format!("{}{}", prefix, id_name), TID::WIDTH)
}

/// Render lookup input as `Name:value,Name:value` for not-found reports
pub fn render_input_key<P: ProcInput + ?Sized>(input: &P) -> String {
    render_fields(&input.fields())
}

pub(crate) fn render_fields(fields: &[FieldValue]) -> String {
    fields
        .iter()
        .map(|field| format!("{}:{}", field.name, field.value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Read one column and convert it to the field type.
/// Called from derived `ProcOutput` impls.
pub fn read_column<V: FromProcValue>(row: &dyn RowView, column: &str) -> Result<V, FieldMappingError> {
    let value = row
        .column(column)?
        .ok_or_else(|| FieldMappingError::missing(column))?;
    V::from_proc_value(value).map_err(|source| FieldMappingError::Conversion {
        column: column.to_string(),
        source,
    })
}

/// Adapts the current row of a cursor to `RowView`
pub struct CursorRow<'a, 'c> {
    cursor: &'a (dyn Cursor + 'c),
}

impl<'a, 'c> CursorRow<'a, 'c> {
    pub fn new(cursor: &'a (dyn Cursor + 'c)) -> Self {
        Self { cursor }
    }
}

impl RowView for CursorRow<'_, '_> {
    fn column(&self, name: &str) -> Result<Option<ProcValue>, FieldMappingError> {
        self.cursor.get_field(name)
    }
}

/// Materialize the current cursor row as `T`
pub fn materialize<T: Record>(cursor: &dyn Cursor, procedure: &str) -> Result<T, DataAccessError> {
    T::materialize(&CursorRow::new(cursor))
        .map_err(|source| DataAccessError::field_mapping(T::descriptor().name(), procedure, source))
}

/// Materialize every remaining row, preserving cursor order
pub async fn materialize_all<T: Record>(
    cursor: &mut (dyn Cursor + '_),
    procedure: &str,
) -> Result<Vec<T>, DataAccessError> {
    let mut items = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| DataAccessError::transport(procedure, e))?
    {
        items.push(materialize::<T>(&*cursor, procedure)?);
    }
    Ok(items)
}

/// Read the identifier output parameter after an insert
pub fn read_output_id<TID: Identifier>(
    command: &dyn Command,
    parameter: &str,
    procedure: &str,
) -> Result<TID, DataAccessError> {
    let value = command
        .output_value(parameter)
        .filter(|value| !value.is_null())
        .ok_or_else(|| DataAccessError::MissingOutput {
            procedure: procedure.to_string(),
            parameter: parameter.to_string(),
        })?;
    TID::from_proc_value(value).map_err(|source| DataAccessError::OutputConversion {
        procedure: procedure.to_string(),
        parameter: parameter.to_string(),
        source,
    })
}

/// An in-memory row keyed by column name (case-insensitive)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    columns: HashMap<String, ProcValue>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<ProcValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<ProcValue>) {
        self.columns.insert(name.to_lowercase(), value.into());
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<N: AsRef<str>, V: Into<ProcValue>> FromIterator<(N, V)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = ColumnMap::new();
        for (name, value) in iter {
            map.insert(name.as_ref(), value);
        }
        map
    }
}

impl RowView for ColumnMap {
    fn column(&self, name: &str) -> Result<Option<ProcValue>, FieldMappingError> {
        Ok(self.columns.get(&name.to_lowercase()).cloned())
    }
}

/// A row holding an input object's own field values
pub fn row_of<P: ProcInput + ?Sized>(input: &P) -> ColumnMap {
    input
        .fields()
        .into_iter()
        .map(|field| (field.name, field.value))
        .collect()
}
