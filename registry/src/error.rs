//! Error types for registry operations.

use std::fmt;

use value::TypeTag;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while populating the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The tag has already been registered.
    DuplicateTag { tag: TypeTag },
}

/// Errors a constructor closure can report.
///
/// Factory failures surface only on the load path; the deserializer treats
/// them as an unresolvable node and degrades gracefully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// Wrong number of constructor arguments.
    ArgCount { expected: usize, actual: usize },

    /// A constructor argument had the wrong shape.
    ArgType {
        index: usize,
        expected: &'static str,
    },

    /// The constructor rejected the arguments.
    Rejected { reason: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTag { tag } => write!(f, "type tag {tag} already registered"),
        }
    }
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgCount { expected, actual } => {
                write!(
                    f,
                    "constructor expected {expected} arguments, got {actual}"
                )
            }
            Self::ArgType { index, expected } => {
                write!(f, "constructor argument {index} is not a {expected}")
            }
            Self::Rejected { reason } => write!(f, "constructor rejected arguments: {reason}"),
        }
    }
}

impl std::error::Error for RegistryError {}
impl std::error::Error for FactoryError {}
