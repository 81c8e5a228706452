//! Serialized node model and tagged primitive codec for gsnap.
//!
//! This crate defines the data that crosses the serialization boundary:
//! - The four-shape node tree (scalar, reference, array, object)
//! - Serialization identities
//! - The tagged primitive codec for values JSON cannot carry natively
//!
//! # Design Principles
//!
//! - **JSON-encodable** - Every node tree round-trips through `serde_json`
//!   without loss; special values travel as tagged strings.
//! - **Explicit ordering** - Object and array nodes carry `propertyOrder`
//!   so reconstruction can replay assignments in the order they were read.
//! - **Graceful degradation** - Malformed tagged strings decode to `None`,
//!   never to an error.

mod codec;
mod id;
mod node;
mod scalar;

pub use codec::{decode_scalar, encode_prim, BIGINT_PREFIX, RESERVED_PREFIX, SYMBOL_PREFIX};
pub use id::SerialId;
pub use node::{ArgNode, ArrayNode, ExternalArg, Node, NodeStats, ObjectNode, RefNode, TypeTag};
pub use scalar::{Prim, Scalar};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = SerialId::new("o1");
        let _ = Scalar::Null;
        let _ = Prim::Null;
        let _ = TypeTag::new("demo.Shape");
        let _ = Node::Scalar(Scalar::Bool(true));
        let _ = encode_prim(&Prim::Null);
    }

    #[test]
    fn prefix_constants_are_distinct() {
        assert!(!BIGINT_PREFIX.starts_with(SYMBOL_PREFIX));
        assert!(!SYMBOL_PREFIX.starts_with(BIGINT_PREFIX));
        assert!(!RESERVED_PREFIX.is_empty());
    }
}
