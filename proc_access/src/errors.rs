//! Error types for procedure calls
//!
//! Every failure a call can surface is a `DataAccessError`. The context the
//! caller needs for logging (lookup input, procedure name) travels on the error.

use crate::validation::ValidationError;
use std::time::Duration;
use thiserror::Error;
use type_mapping::{ConversionError, SerializeError};

#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Record not found: input {input}, procedure {procedure}")]
    NotFound { input: String, procedure: String },

    #[error("Cannot map result of {procedure} onto {record}: {source}")]
    FieldMapping {
        record: &'static str,
        procedure: String,
        #[source]
        source: FieldMappingError,
    },

    #[error("Procedure name resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Transport error calling {procedure}: {source}")]
    Transport {
        procedure: String,
        #[source]
        source: TransportError,
    },

    #[error("Procedure {procedure} did not complete within {timeout:?}")]
    Timeout { procedure: String, timeout: Duration },

    #[error("Procedure {procedure} did not return output parameter {parameter}")]
    MissingOutput { procedure: String, parameter: String },

    #[error("Output parameter {parameter} of {procedure} has the wrong type: {source}")]
    OutputConversion {
        procedure: String,
        parameter: String,
        #[source]
        source: ConversionError,
    },
}

impl DataAccessError {
    pub fn not_found(input: impl Into<String>, procedure: &str) -> Self {
        Self::NotFound {
            input: input.into(),
            procedure: procedure.to_string(),
        }
    }

    pub fn transport(procedure: &str, source: TransportError) -> Self {
        Self::Transport {
            procedure: procedure.to_string(),
            source,
        }
    }

    pub fn field_mapping(record: &'static str, procedure: &str, source: FieldMappingError) -> Self {
        Self::FieldMapping {
            record,
            procedure: procedure.to_string(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Procedure the failing call was bound to, when one had been chosen
    pub fn procedure(&self) -> Option<&str> {
        match self {
            Self::NotFound { procedure, .. }
            | Self::FieldMapping { procedure, .. }
            | Self::Transport { procedure, .. }
            | Self::Timeout { procedure, .. }
            | Self::MissingOutput { procedure, .. }
            | Self::OutputConversion { procedure, .. } => Some(procedure),
            Self::Argument(_) | Self::Resolution(_) => None,
        }
    }
}

impl From<ValidationError> for DataAccessError {
    fn from(err: ValidationError) -> Self {
        Self::Argument(err.to_string())
    }
}

impl From<SerializeError> for DataAccessError {
    fn from(err: SerializeError) -> Self {
        Self::Argument(err.to_string())
    }
}

/// A model field that could not be populated from the current result row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldMappingError {
    #[error("no column named '{column}' in result row")]
    MissingColumn { column: String },

    #[error("column '{column}': {source}")]
    Conversion {
        column: String,
        #[source]
        source: ConversionError,
    },

    #[error("column '{column}' could not be decoded: {reason}")]
    Undecodable { column: String, reason: String },
}

impl FieldMappingError {
    pub fn missing(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }

    pub fn undecodable(column: &str, reason: impl Into<String>) -> Self {
        Self::Undecodable {
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Self::MissingColumn { column }
            | Self::Conversion { column, .. }
            | Self::Undecodable { column, .. } => column,
        }
    }
}

/// Failure of a name resolver to produce a procedure name
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("resolver returned an empty procedure name for {0}")]
    Empty(String),

    #[error("resolver returned an invalid procedure name: {0}")]
    InvalidName(#[from] ValidationError),

    #[error("no procedure is mapped for {0}")]
    Unmapped(String),

    #[error("{0}")]
    Failed(String),
}

/// Failure reported by the underlying connection/execute capability
#[derive(Error, Debug)]
#[error(transparent)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl TransportError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self(source.into())
    }

    /// The backend error, for callers that downcast to a driver type
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_key_and_procedure() {
        let err = DataAccessError::not_found("1", "X.GetObjectByIdTest");
        assert!(err.is_not_found());
        assert_eq!(err.procedure(), Some("X.GetObjectByIdTest"));
        assert_eq!(
            err.to_string(),
            "Record not found: input 1, procedure X.GetObjectByIdTest"
        );
    }

    #[test]
    fn test_transport_keeps_source() {
        let err = DataAccessError::transport("X.Insert", TransportError::new("connection reset"));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Transport error calling X.Insert: connection reset");

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection reset");
    }

    #[test]
    fn test_field_mapping_names_column() {
        let err = FieldMappingError::missing("TestDate");
        assert_eq!(err.column(), "TestDate");
        assert_eq!(err.to_string(), "no column named 'TestDate' in result row");

        let wrapped = DataAccessError::field_mapping("Test", "X.GetListTest", err);
        assert_eq!(wrapped.procedure(), Some("X.GetListTest"));
    }

    #[test]
    fn test_resolution_has_no_procedure() {
        let err: DataAccessError = ResolutionError::Unmapped("GetList".into()).into();
        assert_eq!(err.procedure(), None);
    }
}
