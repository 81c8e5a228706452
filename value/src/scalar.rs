//! Primitive value unions.

use serde::{Deserialize, Serialize};

/// A decoded primitive value, including types JSON cannot carry natively.
#[derive(Debug, Clone, PartialEq)]
pub enum Prim {
    Null,
    Bool(bool),
    Int(i64),
    /// Any finite or non-finite floating point value.
    Float(f64),
    /// A big integer. Values outside `i128` range do not round-trip.
    BigInt(i128),
    /// An atomic symbolic value, identified by its description.
    Symbol(String),
    Str(String),
}

impl Prim {
    /// Returns `true` if this value survives a JSON encoding unchanged,
    /// without needing a tagged string.
    #[must_use]
    pub fn is_json_native(&self) -> bool {
        match self {
            Self::Null | Self::Bool(_) | Self::Int(_) => true,
            Self::Float(f) => f.is_finite(),
            Self::BigInt(_) | Self::Symbol(_) => false,
            Self::Str(_) => true,
        }
    }
}

/// A JSON-encodable primitive: what actually appears in a node tree.
///
/// Invariant: `Float` only ever holds finite values. NaN and the infinities
/// are carried as tagged strings by the codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Returns a short name for the scalar's kind, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}
