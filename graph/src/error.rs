//! Error types for graph operations.
//!
//! Shape problems inside the walkers degrade instead of erroring; the only
//! errors here are the resource limits enforced on the load path, before
//! any live state is touched.

use std::fmt;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while validating a node tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// Limits exceeded.
    LimitExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Nodes,
    Depth,
    PropertiesPerNode,
    Entities,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitExceeded {
                kind,
                limit,
                actual,
            } => write!(f, "{kind} limit exceeded: {actual} > {limit}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nodes => "node count",
            Self::Depth => "nesting depth",
            Self::PropertiesPerNode => "properties per node",
            Self::Entities => "entity count",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for GraphError {}
