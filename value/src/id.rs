//! Serialization identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque key identifying one live object within a single
/// serialize/deserialize pass.
///
/// Identities are assigned at most once per object by the identity table
/// and are never reused by a different object within the same table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialId(String);

impl SerialId {
    /// Creates an identity from its textual form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints the identity for the `n`-th object registered in a table.
    #[must_use]
    pub fn nth(n: u64) -> Self {
        Self(format!("o{n}"))
    }

    /// Returns the textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SerialId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}
