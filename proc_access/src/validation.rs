//! Validation module
//!
//! Procedure names are spliced into the call text by backends, so every name
//! (resolved or caller-supplied) is validated before a connection is opened.

use std::fmt;

/// Validation errors for procedure identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty
    Empty,
    /// A dot-separated part of the name is empty (e.g. `schema..proc`)
    EmptyPart(String),
    /// More qualifying parts than `database.schema.procedure`
    TooManyParts { name: String, parts: usize },
    /// A part is too long
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// A part starts with a character other than a letter or underscore
    InvalidStartCharacter(String),
    /// A part contains characters other than ASCII alphanumerics and underscore
    InvalidCharacters(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty => write!(f, "Procedure name cannot be empty"),
            ValidationError::EmptyPart(name) => {
                write!(f, "Procedure name '{}' has an empty part", name)
            }
            ValidationError::TooManyParts { name, parts } => {
                write!(
                    f,
                    "Procedure name '{}' has {} parts (max {})",
                    name,
                    parts,
                    ProcedureName::MAX_PARTS
                )
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            ValidationError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validated, optionally qualified procedure name (`proc`, `schema.proc`, `db.schema.proc`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcedureName(String);

impl ProcedureName {
    /// Longest identifier accepted for one part
    pub const MAX_LENGTH: usize = 128;
    pub const MAX_PARTS: usize = 3;

    /// Create a new validated procedure name
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::Empty);
        }

        let parts = name.split('.').count();
        if parts > Self::MAX_PARTS {
            return Err(ValidationError::TooManyParts {
                name: name.to_string(),
                parts,
            });
        }

        for part in name.split('.') {
            if part.is_empty() {
                return Err(ValidationError::EmptyPart(name.to_string()));
            }
            validate_identifier(part)?;
        }

        Ok(Self(name.to_string()))
    }

    /// Get the validated name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the validated name as a String
    pub fn into_string(self) -> String {
        self.0
    }

    /// The dot-separated parts, outermost qualifier first
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for ProcedureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProcedureName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Common validation logic for a single unquoted identifier
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;

    if name.len() > ProcedureName::MAX_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: ProcedureName::MAX_LENGTH,
        });
    }

    // Check first character (must be letter or underscore)
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    // Check all characters (alphanumeric or underscore only)
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    Ok(())
}
