//! The four-shape serialized node tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::encode_prim;
use crate::id::SerialId;
use crate::scalar::{Prim, Scalar};

/// A fully qualified type name, dot-separated (`"demo.Shape"`).
///
/// Stamped onto object nodes so the deserializer can resurrect the correct
/// concrete type through the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    /// Creates a tag from its qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the qualified name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// A serialized node: one of the four shapes of the tree.
///
/// Variant order matters for the untagged serde representation: reference
/// nodes are keyed by `referenceTo`, array nodes by the `array` flag,
/// object nodes by `className`; everything else is a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Reference(RefNode),
    Array(ArrayNode),
    Object(ObjectNode),
    Scalar(Scalar),
}

/// "Reuse the already-materialized object with this identity."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefNode {
    #[serde(rename = "referenceTo")]
    pub reference_to: SerialId,
}

/// An array with positional entries (decimal-string keys) plus any extra
/// named properties attached to the array instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayNode {
    /// Marker flag distinguishing array nodes. Always `true`.
    pub array: bool,
    pub serialization_id: SerialId,
    /// Explicit key order. `None` is a degraded input; reconstruction then
    /// falls back to map iteration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_order: Option<Vec<String>>,
    #[serde(default)]
    pub properties: BTreeMap<String, Node>,
}

impl ArrayNode {
    /// Creates an empty array node with the given identity.
    #[must_use]
    pub fn new(id: SerialId) -> Self {
        Self {
            array: true,
            serialization_id: id,
            property_order: Some(Vec::new()),
            properties: BTreeMap::new(),
        }
    }

    /// Appends a keyed entry, keeping `propertyOrder` in sync.
    pub fn push_entry(&mut self, key: impl Into<String>, node: Node) {
        let key = key.into();
        if let Some(order) = &mut self.property_order {
            order.push(key.clone());
        }
        self.properties.insert(key, node);
    }

    /// Returns the keys in reconstruction order.
    #[must_use]
    pub fn ordered_keys(&self) -> Vec<&str> {
        ordered_keys(self.property_order.as_ref(), &self.properties)
    }
}

/// A generic object node: type tag, constructor arguments, and an ordered
/// property map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    pub serialization_id: SerialId,
    pub class_name: TypeTag,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructor_arguments: Vec<ArgNode>,
    /// Explicit key order. Assignments may be setter calls that depend on
    /// earlier ones, so reconstruction must follow it when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_order: Option<Vec<String>>,
    #[serde(default)]
    pub properties: BTreeMap<String, Node>,
}

impl ObjectNode {
    /// Creates an empty object node with the given identity and tag.
    #[must_use]
    pub fn new(id: SerialId, tag: TypeTag) -> Self {
        Self {
            serialization_id: id,
            class_name: tag,
            constructor_arguments: Vec::new(),
            property_order: Some(Vec::new()),
            properties: BTreeMap::new(),
        }
    }

    /// Appends a property, keeping `propertyOrder` in sync.
    pub fn push_property(&mut self, name: impl Into<String>, node: Node) {
        let name = name.into();
        if let Some(order) = &mut self.property_order {
            order.push(name.clone());
        }
        self.properties.insert(name, node);
    }

    /// Returns the property names in reconstruction order.
    #[must_use]
    pub fn ordered_keys(&self) -> Vec<&str> {
        ordered_keys(self.property_order.as_ref(), &self.properties)
    }

    /// Returns `true` if `propertyOrder` is present and lists exactly the
    /// keys of the property map.
    #[must_use]
    pub fn has_consistent_order(&self) -> bool {
        self.property_order.as_ref().is_some_and(|order| {
            order.len() == self.properties.len()
                && order.iter().all(|k| self.properties.contains_key(k))
        })
    }
}

/// One serialized constructor argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgNode {
    /// Flagged "supplied externally": the serializer omitted the value and
    /// the deserializer asks the caller to inject the live one.
    External(ExternalArg),
    Value(Node),
}

/// Marker payload for externally supplied constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalArg {
    pub external: bool,
}

impl ArgNode {
    /// Creates the external-argument marker.
    #[must_use]
    pub fn external() -> Self {
        Self::External(ExternalArg { external: true })
    }

    /// Returns `true` for externally supplied arguments.
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// Size accounting for a node tree, used by load-path validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStats {
    /// Total node count, constructor arguments included.
    pub nodes: usize,
    /// Maximum nesting depth (a lone scalar has depth 1).
    pub depth: usize,
    /// Largest property map in the tree.
    pub max_properties: usize,
}

impl Node {
    /// Wraps a primitive, routing it through the tagged codec.
    #[must_use]
    pub fn from_prim(prim: &Prim) -> Self {
        Self::Scalar(encode_prim(prim))
    }

    /// Returns a short name for the node's shape, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Reference(_) => "reference",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Scalar(_) => "scalar",
        }
    }

    /// Walks the tree iteratively and returns its size accounting.
    #[must_use]
    pub fn stats(&self) -> NodeStats {
        let mut stats = NodeStats::default();
        let mut stack: Vec<(&Self, usize)> = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            stats.nodes += 1;
            stats.depth = stats.depth.max(depth);
            match node {
                Self::Scalar(_) | Self::Reference(_) => {}
                Self::Array(array) => {
                    stats.max_properties = stats.max_properties.max(array.properties.len());
                    for child in array.properties.values() {
                        stack.push((child, depth + 1));
                    }
                }
                Self::Object(object) => {
                    stats.max_properties = stats.max_properties.max(object.properties.len());
                    for child in object.properties.values() {
                        stack.push((child, depth + 1));
                    }
                    for arg in &object.constructor_arguments {
                        if let ArgNode::Value(child) = arg {
                            stack.push((child, depth + 1));
                        }
                    }
                }
            }
        }
        stats
    }
}

fn ordered_keys<'a>(
    order: Option<&'a Vec<String>>,
    properties: &'a BTreeMap<String, Node>,
) -> Vec<&'a str> {
    match order {
        Some(order)
            if order.len() == properties.len()
                && order.iter().all(|k| properties.contains_key(k)) =>
        {
            order.iter().map(String::as_str).collect()
        }
        // Degraded path: BTreeMap key order, deterministic but unspecified.
        _ => properties.keys().map(String::as_str).collect(),
    }
}
