//! Name resolution contract
//!
//! The mapped accessor never knows procedure names itself. It describes the
//! call as an `OperationContext` and asks a `NameResolver` for the name.

use crate::errors::ResolutionError;
use crate::traits::record::{Record, TypeDescriptor};
use std::fmt;
use std::str::FromStr;

/// The kind of call being made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    GetObjectById,
    GetObjectWithParameters,
    GetList,
    GetListWithParameters,
    Insert,
    UpdateById,
    IdCall,
    ParameterCall,
    NoParameterCall,
}

impl OperationKind {
    pub const ALL: [OperationKind; 9] = [
        OperationKind::GetObjectById,
        OperationKind::GetObjectWithParameters,
        OperationKind::GetList,
        OperationKind::GetListWithParameters,
        OperationKind::Insert,
        OperationKind::UpdateById,
        OperationKind::IdCall,
        OperationKind::ParameterCall,
        OperationKind::NoParameterCall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::GetObjectById => "GetObjectById",
            OperationKind::GetObjectWithParameters => "GetObjectWithParameters",
            OperationKind::GetList => "GetList",
            OperationKind::GetListWithParameters => "GetListWithParameters",
            OperationKind::Insert => "Insert",
            OperationKind::UpdateById => "UpdateById",
            OperationKind::IdCall => "IdCall",
            OperationKind::ParameterCall => "ParameterCall",
            OperationKind::NoParameterCall => "NoParameterCall",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ResolutionError::Failed(format!("unknown operation '{}'", s)))
    }
}

/// What the resolver is asked about: an operation, optionally with the model type it centers on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationContext {
    Tag(OperationKind),
    Typed(OperationKind, TypeDescriptor),
}

impl OperationContext {
    pub fn typed<T: Record>(kind: OperationKind) -> Self {
        OperationContext::Typed(kind, T::descriptor())
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            OperationContext::Tag(kind) | OperationContext::Typed(kind, _) => *kind,
        }
    }

    pub fn type_context(&self) -> Option<TypeDescriptor> {
        match self {
            OperationContext::Tag(_) => None,
            OperationContext::Typed(_, descriptor) => Some(*descriptor),
        }
    }
}

/// Renders as `Kind` or `Kind:Type`
impl fmt::Display for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationContext::Tag(kind) => write!(f, "{}", kind),
            OperationContext::Typed(kind, descriptor) => write!(f, "{}:{}", kind, descriptor),
        }
    }
}

/// Maps an operation context to a procedure name.
///
/// Implementations must be deterministic and free of side effects. The
/// engine validates the returned name and propagates errors unchanged.
pub trait NameResolver: Send + Sync {
    fn resolve(&self, context: &OperationContext) -> Result<String, ResolutionError>;
}

impl<F> NameResolver for F
where
    F: Fn(&OperationContext) -> Result<String, ResolutionError> + Send + Sync,
{
    fn resolve(&self, context: &OperationContext) -> Result<String, ResolutionError> {
        self(context)
    }
}
