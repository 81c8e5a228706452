//! The object graph deserializer.

use std::cell::RefCell;
use std::rc::Rc;

use registry::TypeRegistry;
use value::{decode_scalar, ArgNode, Node, TypeTag};

use crate::identity::IdentityTable;
use crate::object::{LiveArray, ObjHandle, Value};

/// The registry instantiation the deserializer works against: constructor
/// arguments come in as live values, instances come out as object handles.
pub type ObjectRegistry = TypeRegistry<Value, ObjHandle>;

/// Supplies live values for constructor arguments flagged
/// "supplied externally" — typically a back-reference to an owning
/// container that is not part of the serialized subtree.
pub trait ExternalArgs {
    /// Returns the next external argument for an instance of `tag`.
    /// Arguments are requested in constructor order.
    fn next_external(&mut self, tag: &TypeTag) -> Option<Value>;
}

/// An [`ExternalArgs`] provider with nothing to supply.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternalArgs;

impl ExternalArgs for NoExternalArgs {
    fn next_external(&mut self, _tag: &TypeTag) -> Option<Value> {
        None
    }
}

/// Walks a serialized node into a live value.
///
/// Returns `None` for values lost at the edge: malformed tagged primitives
/// and dangling references. A parent skips such properties rather than
/// failing the whole graph.
///
/// The table must be fresh for each top-level call and dropped afterwards.
pub fn deserialize_node(
    node: &Node,
    table: &mut IdentityTable,
    registry: &ObjectRegistry,
    externals: &mut dyn ExternalArgs,
) -> Option<Value> {
    match node {
        Node::Scalar(scalar) => decode_scalar(scalar).map(Value::Prim),
        // Shared-reference reconstruction: every reference to an identity
        // resolves to the one instance materialized under it.
        Node::Reference(reference) => table.lookup(&reference.reference_to),
        Node::Array(array_node) => {
            let handle = Rc::new(RefCell::new(LiveArray::default()));
            // Register before populating so a self-referential entry
            // resolves to this same array.
            table.insert(
                array_node.serialization_id.clone(),
                Value::Array(handle.clone()),
            );
            for key in array_node.ordered_keys() {
                let Some(child_node) = array_node.properties.get(key) else {
                    continue;
                };
                let Some(child) = deserialize_node(child_node, table, registry, externals) else {
                    continue;
                };
                let mut array = handle.borrow_mut();
                if let Ok(index) = key.parse::<usize>() {
                    array.set_index(index, child);
                } else {
                    array.set_extra(key, child);
                }
            }
            Some(Value::Array(handle))
        }
        Node::Object(object_node) => {
            let Some(factory) = registry.resolve(&object_node.class_name) else {
                // Unresolvable tag: keep the raw node as inert data,
                // registered under its identity so references still work.
                let raw = Value::Raw(Rc::new(object_node.clone()));
                table.insert(object_node.serialization_id.clone(), raw.clone());
                return Some(raw);
            };

            let mut args = Vec::with_capacity(object_node.constructor_arguments.len());
            for arg in &object_node.constructor_arguments {
                let arg_value = match arg {
                    ArgNode::External(_) => externals.next_external(&object_node.class_name),
                    ArgNode::Value(arg_node) => {
                        deserialize_node(arg_node, table, registry, externals)
                    }
                };
                args.push(arg_value.unwrap_or_else(Value::null));
            }

            let instance = match factory(args) {
                Ok(instance) => instance,
                Err(_) => {
                    // A rejecting constructor gets the same treatment as an
                    // unknown tag: inert data, no exception.
                    let raw = Value::Raw(Rc::new(object_node.clone()));
                    table.insert(object_node.serialization_id.clone(), raw.clone());
                    return Some(raw);
                }
            };

            let result = Value::Object(instance.clone());
            // Mirror of the serializer's ordering invariant: the identity
            // must resolve before any property is assigned.
            table.insert(object_node.serialization_id.clone(), result.clone());

            for key in object_node.ordered_keys() {
                let Some(child_node) = object_node.properties.get(key) else {
                    continue;
                };
                let Some(child) = deserialize_node(child_node, table, registry, externals) else {
                    continue;
                };
                instance.borrow_mut().set_property(key, child);
            }
            Some(result)
        }
    }
}
