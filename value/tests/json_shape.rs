//! Golden JSON shapes for the node tree.
//!
//! Saved projects are plain JSON; these tests pin the wire shapes so a file
//! written by one build loads in another.

use serde_json::json;
use value::{ArgNode, ArrayNode, Node, ObjectNode, RefNode, Scalar, SerialId, TypeTag};

#[test]
fn reference_node_shape() {
    let node = Node::Reference(RefNode {
        reference_to: SerialId::nth(4),
    });
    let actual = serde_json::to_value(&node).unwrap();
    assert_eq!(actual, json!({ "referenceTo": "o4" }));

    let back: Node = serde_json::from_value(actual).unwrap();
    assert_eq!(back, node);
}

#[test]
fn array_node_shape() {
    let mut array = ArrayNode::new(SerialId::nth(1));
    array.push_entry("0", Node::Scalar(Scalar::Int(1)));
    array.push_entry("1", Node::Scalar(Scalar::Int(2)));
    array.push_entry("tag", Node::Scalar(Scalar::Str("hello".into())));
    let node = Node::Array(array);

    let actual = serde_json::to_value(&node).unwrap();
    assert_eq!(
        actual,
        json!({
            "array": true,
            "serializationId": "o1",
            "propertyOrder": ["0", "1", "tag"],
            "properties": { "0": 1, "1": 2, "tag": "hello" }
        })
    );

    let back: Node = serde_json::from_value(actual).unwrap();
    assert_eq!(back, node);
}

#[test]
fn object_node_shape() {
    let mut object = ObjectNode::new(SerialId::nth(2), TypeTag::new("demo.Shape"));
    object.constructor_arguments = vec![
        ArgNode::Value(Node::Scalar(Scalar::Str("rect".into()))),
        ArgNode::external(),
    ];
    object.push_property("width", Node::Scalar(Scalar::Float(2.5)));
    object.push_property("visible", Node::Scalar(Scalar::Bool(true)));
    let node = Node::Object(object);

    let actual = serde_json::to_value(&node).unwrap();
    assert_eq!(
        actual,
        json!({
            "serializationId": "o2",
            "className": "demo.Shape",
            "constructorArguments": ["rect", { "external": true }],
            "propertyOrder": ["width", "visible"],
            "properties": { "width": 2.5, "visible": true }
        })
    );

    let back: Node = serde_json::from_value(actual).unwrap();
    assert_eq!(back, node);
}

#[test]
fn object_node_without_order_still_parses() {
    let raw = json!({
        "serializationId": "o9",
        "className": "demo.Unknown",
        "properties": { "a": 1 }
    });
    let node: Node = serde_json::from_value(raw).unwrap();
    let Node::Object(object) = node else {
        panic!("expected object node");
    };
    assert!(object.property_order.is_none());
    assert_eq!(object.ordered_keys(), vec!["a"]);
}

#[test]
fn scalar_nodes_stay_plain() {
    for (node, expected) in [
        (Node::Scalar(Scalar::Null), json!(null)),
        (Node::Scalar(Scalar::Bool(false)), json!(false)),
        (Node::Scalar(Scalar::Int(-3)), json!(-3)),
        (Node::Scalar(Scalar::Str("x".into())), json!("x")),
    ] {
        assert_eq!(serde_json::to_value(&node).unwrap(), expected);
    }
}

#[test]
fn nested_tree_roundtrips_through_text() {
    let mut inner = ObjectNode::new(SerialId::nth(3), TypeTag::new("demo.Style"));
    inner.push_property("color", Node::Scalar(Scalar::Str("red".into())));

    let mut outer = ObjectNode::new(SerialId::nth(2), TypeTag::new("demo.Shape"));
    outer.push_property("style", Node::Object(inner));
    outer.push_property(
        "self",
        Node::Reference(RefNode {
            reference_to: SerialId::nth(2),
        }),
    );
    let node = Node::Object(outer);

    let text = serde_json::to_string(&node).unwrap();
    let back: Node = serde_json::from_str(&text).unwrap();
    assert_eq!(back, node);
}

#[test]
fn full_precision_floats_survive_json_text_exactly() {
    // 17 significant digits force the shortest-roundtrip printer and the
    // correctly rounded parser to agree bit for bit.
    for f in [-256_756_661.502_401_62, 2.225_073_858_507_201e-308, 0.1 + 0.2] {
        let node = Node::Scalar(Scalar::Float(f));
        let text = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&text).unwrap();
        assert_eq!(back, node);
    }
}
