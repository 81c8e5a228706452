//! The object graph serializer.

use value::{ArgNode, ArrayNode, Node, ObjectNode, RefNode, Scalar, SerialId};

use crate::identity::IdentityTable;
use crate::object::{CtorArg, Value};

/// Walks a live value into a serialized node.
///
/// Returns `None` for values that serialize to nothing (environment
/// handles, objects with the skip marker); a parent omits such values from
/// its property map entirely.
///
/// The table must be fresh for each top-level call and dropped afterwards.
pub fn serialize_value(value: &Value, table: &mut IdentityTable) -> Option<Node> {
    match value {
        Value::Handle => None,
        Value::Prim(prim) => Some(Node::from_prim(prim)),
        Value::Raw(raw) => {
            if let Some(id) = table.id_of(value) {
                return Some(Node::Reference(RefNode {
                    reference_to: id.clone(),
                }));
            }
            // The stored identity came from an earlier pass. If this pass
            // has already minted it for something else, the raw node gets a
            // fresh one, with any internal self-references rewritten.
            if table.contains(&raw.serialization_id) {
                let id = table.register(value);
                let mut node = (**raw).clone();
                rewrite_identity(&mut node, &raw.serialization_id, &id);
                node.serialization_id = id;
                return Some(Node::Object(node));
            }
            table.insert(raw.serialization_id.clone(), value.clone());
            Some(Node::Object((**raw).clone()))
        }
        Value::Object(object) => {
            if object.borrow().skip_serialization() {
                return None;
            }
            // Cycle-breaking: an object already materialized in this pass
            // becomes a reference, never a second full node.
            if let Some(id) = table.id_of(value) {
                return Some(Node::Reference(RefNode {
                    reference_to: id.clone(),
                }));
            }
            let id = table.register(value);

            let object = object.borrow();
            if let Some(custom) = object.custom_serialize(&id, table) {
                return Some(custom);
            }

            let mut node = ObjectNode::new(id, object.type_tag());
            for arg in object.constructor_args() {
                node.constructor_arguments.push(match arg {
                    CtorArg::External => ArgNode::external(),
                    CtorArg::Value(arg_value) => ArgNode::Value(
                        serialize_value(&arg_value, table)
                            .unwrap_or(Node::Scalar(Scalar::Null)),
                    ),
                });
            }
            for (name, property) in object.properties() {
                if let Some(child) = serialize_value(&property, table) {
                    node.push_property(name, child);
                }
            }
            Some(Node::Object(node))
        }
        Value::Array(array) => {
            if let Some(id) = table.id_of(value) {
                return Some(Node::Reference(RefNode {
                    reference_to: id.clone(),
                }));
            }
            let id = table.register(value);

            let array = array.borrow();
            let mut node = ArrayNode::new(id);
            for (index, item) in array.items.iter().enumerate() {
                if let Some(child) = serialize_value(item, table) {
                    node.push_entry(index.to_string(), child);
                }
            }
            for (name, extra) in &array.extras {
                if let Some(child) = serialize_value(extra, table) {
                    node.push_entry(name.clone(), child);
                }
            }
            Some(Node::Array(node))
        }
    }
}

/// Replaces every reference to `old` inside the tree with `new`.
///
/// Raw nodes can carry self-references from the pass that produced them;
/// re-minting the node's identity must not leave those dangling.
fn rewrite_identity(node: &mut ObjectNode, old: &SerialId, new: &SerialId) {
    for arg in &mut node.constructor_arguments {
        if let ArgNode::Value(child) = arg {
            rewrite_node(child, old, new);
        }
    }
    for child in node.properties.values_mut() {
        rewrite_node(child, old, new);
    }
}

fn rewrite_node(node: &mut Node, old: &SerialId, new: &SerialId) {
    match node {
        Node::Reference(reference) => {
            if reference.reference_to == *old {
                reference.reference_to = new.clone();
            }
        }
        Node::Object(object) => rewrite_identity(object, old, new),
        Node::Array(array) => {
            for child in array.properties.values_mut() {
                rewrite_node(child, old, new);
            }
        }
        Node::Scalar(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use value::{Prim, TypeTag};

    use crate::object::{LiveArray, Serializable};

    struct Point {
        x: f64,
        y: f64,
    }

    impl Serializable for Point {
        fn type_tag(&self) -> TypeTag {
            TypeTag::new("test.Point")
        }

        fn properties(&self) -> Vec<(String, Value)> {
            vec![
                ("x".into(), Value::float(self.x)),
                ("y".into(), Value::float(self.y)),
            ]
        }

        fn set_property(&mut self, name: &str, value: Value) {
            if let Some(Prim::Float(f)) = value.as_prim() {
                match name {
                    "x" => self.x = *f,
                    "y" => self.y = *f,
                    _ => {}
                }
            }
        }
    }

    struct Hidden;

    impl Serializable for Hidden {
        fn type_tag(&self) -> TypeTag {
            TypeTag::new("test.Hidden")
        }

        fn properties(&self) -> Vec<(String, Value)> {
            Vec::new()
        }

        fn set_property(&mut self, _: &str, _: Value) {}

        fn skip_serialization(&self) -> bool {
            true
        }
    }

    #[test]
    fn primitives_encode_through_codec() {
        let mut table = IdentityTable::new();
        let node = serialize_value(&Value::float(f64::NAN), &mut table).unwrap();
        assert_eq!(node, Node::Scalar(Scalar::Str("@gsnap@NaN".into())));
    }

    #[test]
    fn handles_serialize_to_nothing() {
        let mut table = IdentityTable::new();
        assert!(serialize_value(&Value::Handle, &mut table).is_none());
    }

    #[test]
    fn skip_marker_serializes_to_nothing() {
        let mut table = IdentityTable::new();
        let hidden = Value::object(Rc::new(RefCell::new(Hidden)));
        assert!(serialize_value(&hidden, &mut table).is_none());
    }

    #[test]
    fn object_node_carries_tag_and_ordered_properties() {
        let mut table = IdentityTable::new();
        let point = Value::object(Rc::new(RefCell::new(Point { x: 1.0, y: 2.0 })));
        let Some(Node::Object(node)) = serialize_value(&point, &mut table) else {
            panic!("expected object node");
        };
        assert_eq!(node.class_name, TypeTag::new("test.Point"));
        assert_eq!(node.ordered_keys(), vec!["x", "y"]);
    }

    #[test]
    fn second_occurrence_becomes_reference() {
        let mut table = IdentityTable::new();
        let point = Value::object(Rc::new(RefCell::new(Point { x: 0.0, y: 0.0 })));
        let shared = Value::Array(Rc::new(RefCell::new(LiveArray::from_items(vec![
            point.clone(),
            point,
        ]))));

        let Some(Node::Array(node)) = serialize_value(&shared, &mut table) else {
            panic!("expected array node");
        };
        let first = &node.properties["0"];
        let second = &node.properties["1"];
        assert!(matches!(first, Node::Object(_)));
        let Node::Reference(reference) = second else {
            panic!("expected reference, got {}", second.kind_name());
        };
        let Node::Object(full) = first else {
            unreachable!()
        };
        assert_eq!(reference.reference_to, full.serialization_id);
    }

    #[test]
    fn array_extras_follow_items_in_order() {
        let mut table = IdentityTable::new();
        let mut array = LiveArray::from_items(vec![Value::int(1), Value::int(2)]);
        array.set_extra("tag", Value::str("hello"));
        let handle = Value::Array(Rc::new(RefCell::new(array)));

        let Some(Node::Array(node)) = serialize_value(&handle, &mut table) else {
            panic!("expected array node");
        };
        assert_eq!(node.ordered_keys(), vec!["0", "1", "tag"]);
    }

    #[test]
    fn handles_inside_arrays_are_omitted() {
        let mut table = IdentityTable::new();
        let handle = Value::Array(Rc::new(RefCell::new(LiveArray::from_items(vec![
            Value::int(1),
            Value::Handle,
            Value::int(3),
        ]))));

        let Some(Node::Array(node)) = serialize_value(&handle, &mut table) else {
            panic!("expected array node");
        };
        // The handle drops out; surviving items keep their positional keys.
        assert_eq!(node.ordered_keys(), vec!["0", "2"]);
    }
}
