//! Cycle-safe object graph serializer and deserializer for gsnap.
//!
//! This is the core crate: it walks a live, possibly cyclic graph of typed
//! domain objects into a tree of plain encodable nodes, and reconstructs a
//! live, correctly-typed, cycle-correct graph from such a tree.
//!
//! # Features
//!
//! - Identity-based cycle breaking and shared-reference deduplication
//! - Polymorphic reconstruction through a host-populated type registry
//! - Arrays with extra named properties
//! - Externally supplied constructor arguments
//! - Graceful degradation on unknown tags and malformed primitives
//!
//! # Design Principles
//!
//! - **Identity before traversal** - Every object is registered in the
//!   identity table before any of its properties are walked. This single
//!   ordering invariant is what keeps self-referential and mutually
//!   referential graphs from recursing forever, on both sides.
//! - **Degrade, don't throw** - Shape problems in the data lose the
//!   affected value, never the whole graph. Errors exist only for the
//!   resource limits enforced on the load path.

mod deserialize;
mod error;
mod identity;
mod limits;
mod object;
mod serialize;

pub use deserialize::{deserialize_node, ExternalArgs, NoExternalArgs, ObjectRegistry};
pub use error::{GraphError, GraphResult, LimitKind};
pub use identity::IdentityTable;
pub use limits::{validate_node, DecodeLimits};
pub use object::{ArrayHandle, CtorArg, LiveArray, ObjHandle, Serializable, Value};
pub use serialize::serialize_value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = IdentityTable::new();
        let _ = DecodeLimits::default();
        let _ = Value::Prim(value::Prim::Null);
        let _ = LiveArray::default();
        let _: GraphResult<()> = Ok(());
        let _ = NoExternalArgs;
    }
}
