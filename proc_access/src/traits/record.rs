//! Model descriptor traits
//!
//! A model type describes its own field/column mapping at compile time,
//! normally through `#[derive(Record)]`.

use crate::errors::FieldMappingError;
use std::borrow::Cow;
use std::fmt;
use type_mapping::ProcValue;

/// One named value taken from an input object
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub name: Cow<'static, str>,
    pub value: ProcValue,
}

impl FieldValue {
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<ProcValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Type context handed to a name resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: &'static str,
}

impl TypeDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Read access to the current row of a result set
pub trait RowView {
    /// Value of the named column, matched case-insensitively.
    /// `Ok(None)` means the row has no such column.
    fn column(&self, name: &str) -> Result<Option<ProcValue>, FieldMappingError>;
}

/// Types whose fields become input parameters
pub trait ProcInput {
    /// Field values in declaration order
    fn fields(&self) -> Vec<FieldValue>;
}

impl<T: ProcInput + ?Sized> ProcInput for &T {
    fn fields(&self) -> Vec<FieldValue> {
        (**self).fields()
    }
}

/// Types that can be populated from a result row
pub trait ProcOutput: Sized {
    fn materialize(row: &dyn RowView) -> Result<Self, FieldMappingError>;
}

/// A model type usable in both directions.
///
/// Derive it:
/// ```
/// use proc_access::Record;
///
/// #[derive(Debug, Clone, PartialEq, Record)]
/// #[record(rename_all = "PascalCase")]
/// pub struct Test {
///     pub test_date: chrono::NaiveDateTime,
///     pub test_string: String,
///     pub test_int: i32,
/// }
///
/// assert_eq!(Test::field_names(), &["TestDate", "TestString", "TestInt"]);
/// assert_eq!(Test::descriptor().name(), "Test");
/// ```
pub trait Record: ProcInput + ProcOutput + Send + Sync + 'static {
    /// Type context passed to name resolvers
    fn descriptor() -> TypeDescriptor;

    /// Column names, in field declaration order
    fn field_names() -> &'static [&'static str];
}
