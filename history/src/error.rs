//! Errors for the history manager and the project text encoding.

use std::error::Error;
use std::fmt;

use graph::GraphError;

/// Result alias for reentrancy guard operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors from the named-operation reentrancy guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// `begin_operation` named an operation that is already in flight.
    OperationAlreadyActive {
        /// The operation name.
        name: String,
    },
    /// `end_operation` named an operation that was never begun.
    OperationNotActive {
        /// The operation name.
        name: String,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OperationAlreadyActive { name } => {
                write!(f, "operation {name:?} is already in flight")
            }
            Self::OperationNotActive { name } => {
                write!(f, "operation {name:?} is not in flight")
            }
        }
    }
}

impl Error for HistoryError {}

/// Result alias for project encode/decode and load.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Errors from encoding, decoding, or loading project text.
#[derive(Debug)]
pub enum ProjectError {
    /// The text is not valid JSON for a project snapshot.
    Parse(String),
    /// The format marker is not the expected one.
    UnrecognizedFormat {
        /// The marker found in the file.
        found: String,
    },
    /// The file was written by a newer format version.
    UnsupportedVersion {
        /// The version found in the file.
        found: u32,
    },
    /// An entity tree exceeded the decode limits.
    Limits(GraphError),
    /// The snapshot could not be rendered to text.
    Encode(String),
    /// A load or restore re-entered itself.
    Busy {
        /// The operation already in flight.
        operation: String,
    },
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(detail) => write!(f, "project text is not valid: {detail}"),
            Self::UnrecognizedFormat { found } => {
                write!(f, "not a project file (format marker {found:?})")
            }
            Self::UnsupportedVersion { found } => {
                write!(f, "project format version {found} is not supported")
            }
            Self::Limits(err) => write!(f, "project exceeds decode limits: {err}"),
            Self::Encode(detail) => write!(f, "project could not be encoded: {detail}"),
            Self::Busy { operation } => {
                write!(f, "operation {operation:?} is already in flight")
            }
        }
    }
}

impl Error for ProjectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Limits(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GraphError> for ProjectError {
    fn from(err: GraphError) -> Self {
        Self::Limits(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = HistoryError::OperationAlreadyActive {
            name: "edit".into(),
        };
        assert_eq!(err.to_string(), "operation \"edit\" is already in flight");

        let err = ProjectError::UnrecognizedFormat {
            found: "unknown".into(),
        };
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn limits_error_keeps_source() {
        let err = ProjectError::from(GraphError::LimitExceeded {
            kind: graph::LimitKind::Nodes,
            limit: 4,
            actual: 9,
        });
        assert!(Error::source(&err).is_some());
    }
}
