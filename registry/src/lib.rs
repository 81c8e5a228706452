//! Type registry and polymorphic factory map for gsnap.
//!
//! Maps fully qualified type names to constructor closures so the
//! deserializer can resurrect the correct concrete type from a tagged node.
//!
//! # Design Principles
//!
//! - **Explicit lifecycle** - The host populates one registry at startup
//!   and passes it in; there is no ambient global state.
//! - **Unknown tags are not errors** - Resolution returns `Option`; the
//!   deserializer degrades gracefully on a miss.
//! - **Deterministic fingerprint** - The registered tag set hashes to a
//!   stable `u64`, recorded in saved projects and compared at load.

mod error;
mod fingerprint;
mod registry;

pub use error::{FactoryError, RegistryError, RegistryResult};
pub use fingerprint::registry_fingerprint;
pub use registry::{Factory, TypeRegistry};
