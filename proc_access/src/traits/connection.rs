//! Call capability traits
//!
//! The engine never talks to a driver directly. A backend provides a
//! `Connector`; each call opens one `Connection`, prepares one `Command` on it
//! and, for row-returning calls, reads one `Cursor`. The borrows nest, so the
//! cursor is always dropped before its command and the command before its
//! connection.

use crate::errors::{FieldMappingError, TransportError};
use crate::options::CallOptions;
use crate::validation::ProcedureName;
use async_trait::async_trait;
use type_mapping::{IdWidth, ProcValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

/// A parameter bound to a prepared command
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: ProcValue,
    pub direction: Direction,
    /// Declared width, set for identifier output parameters
    pub width: Option<IdWidth>,
}

impl Parameter {
    pub fn input(name: impl Into<String>, value: impl Into<ProcValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            direction: Direction::Input,
            width: None,
        }
    }

    pub fn output(name: impl Into<String>, width: IdWidth) -> Self {
        Self {
            name: name.into(),
            value: ProcValue::Null,
            direction: Direction::Output,
            width: Some(width),
        }
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Output
    }
}

/// Opens connections. Must tolerate concurrent `open` calls.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection for one call. `options` carries the caller's
    /// timeout so the backend can apply it server-side.
    async fn open(
        &self,
        connection_string: &str,
        options: &CallOptions,
    ) -> Result<Box<dyn Connection>, TransportError>;
}

/// An open connection; released when dropped
pub trait Connection: Send {
    /// Prepare a stored-procedure command
    fn prepare<'c>(&'c mut self, procedure: &ProcedureName) -> Box<dyn Command + 'c>;
}

#[async_trait]
pub trait Command: Send {
    fn add_parameter(&mut self, parameter: Parameter);

    /// Execute and return a forward-only cursor over the result rows
    async fn execute_reader<'c>(&'c mut self) -> Result<Box<dyn Cursor + 'c>, TransportError>;

    /// Execute for side effects, returning the affected row count when known
    async fn execute_non_query(&mut self) -> Result<u64, TransportError>;

    /// Value of an output parameter after `execute_non_query`
    fn output_value(&self, name: &str) -> Option<ProcValue>;
}

#[async_trait]
pub trait Cursor: Send {
    /// Move to the next row; `false` at end of results
    async fn advance(&mut self) -> Result<bool, TransportError>;

    /// Column of the current row, matched case-insensitively
    fn get_field(&self, name: &str) -> Result<Option<ProcValue>, FieldMappingError>;
}
