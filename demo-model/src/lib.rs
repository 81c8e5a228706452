//! Reference document model for the gsnap demo.
//!
//! A minimal vector-drawing document: shapes, groups with parent
//! back-references (a genuine cycle), a custom-serializing stroke
//! style, and a [`Canvas`] host wiring the whole contract together.

use std::cell::RefCell;
use std::rc::Rc;

use graph::{CtorArg, ExternalArgs, IdentityTable, ObjHandle, ObjectRegistry, Serializable, Value};
use history::{ProjectHost, Viewport};
use registry::FactoryError;
use value::{ArgNode, Node, ObjectNode, Prim, Scalar, SerialId, TypeTag};

pub const SHAPE_TAG: &str = "demo.Shape";
pub const GROUP_TAG: &str = "demo.Group";
pub const STROKE_TAG: &str = "demo.Stroke";

/// A leaf drawing element.
#[derive(Debug)]
pub struct Shape {
    kind: String,
    name: String,
    x: f64,
    y: f64,
    stroke: Option<Value>,
    parent: Option<Value>,
}

impl Shape {
    #[must_use]
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            stroke: None,
            parent: None,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn set_stroke(&mut self, stroke: Value) {
        self.stroke = Some(stroke);
    }

    /// Links this shape back to its containing group.
    pub fn set_parent(&mut self, parent: Value) {
        self.parent = Some(parent);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Value> {
        self.parent.as_ref()
    }
}

impl Serializable for Shape {
    fn type_tag(&self) -> TypeTag {
        TypeTag::new(SHAPE_TAG)
    }

    fn constructor_args(&self) -> Vec<CtorArg> {
        vec![
            CtorArg::Value(Value::str(self.kind.clone())),
            CtorArg::Value(Value::str(self.name.clone())),
        ]
    }

    fn properties(&self) -> Vec<(String, Value)> {
        let mut out = vec![
            ("x".into(), Value::float(self.x)),
            ("y".into(), Value::float(self.y)),
        ];
        if let Some(stroke) = &self.stroke {
            out.push(("stroke".into(), stroke.clone()));
        }
        if let Some(parent) = &self.parent {
            out.push(("parent".into(), parent.clone()));
        }
        out
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match (name, value) {
            ("x", Value::Prim(p)) => {
                if let Some(x) = as_number(&p) {
                    self.x = x;
                }
            }
            ("y", Value::Prim(p)) => {
                if let Some(y) = as_number(&p) {
                    self.y = y;
                }
            }
            ("stroke", v) => self.stroke = Some(v),
            ("parent", v) => self.parent = Some(v),
            _ => {}
        }
    }
}

/// A named collection of child elements.
///
/// The owning canvas document is a constructor argument supplied
/// externally at reconstruction, never part of the serialized tree.
/// Children hold `parent` back-references, so every non-empty group
/// forms a reference cycle.
#[derive(Debug)]
pub struct Group {
    owner: Value,
    name: String,
    children: Value,
}

impl Group {
    #[must_use]
    pub fn new(owner: Value, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
            children: Value::array(Vec::new()),
        }
    }

    /// Appends a child and sets its back-reference when it is a shape.
    pub fn add_child(&mut self, group_handle: &Value, child: Value) {
        if let Some(object) = child.as_object() {
            object
                .borrow_mut()
                .set_property("parent", group_handle.clone());
        }
        if let Some(array) = self.children.as_array() {
            let index = array.borrow().items.len();
            array.borrow_mut().set_index(index, child);
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn children(&self) -> Value {
        self.children.clone()
    }

    #[must_use]
    pub fn owner(&self) -> &Value {
        &self.owner
    }
}

impl Serializable for Group {
    fn type_tag(&self) -> TypeTag {
        TypeTag::new(GROUP_TAG)
    }

    fn constructor_args(&self) -> Vec<CtorArg> {
        vec![CtorArg::External, CtorArg::Value(Value::str(self.name.clone()))]
    }

    fn properties(&self) -> Vec<(String, Value)> {
        vec![("children".into(), self.children.clone())]
    }

    fn set_property(&mut self, name: &str, value: Value) {
        if name == "children" {
            self.children = value;
        }
    }
}

/// A stroke style with a dash pattern.
///
/// Encodes itself through a custom node instead of the generic walk,
/// packing the dash lengths into a single pattern string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stroke {
    color: String,
    dash: Vec<u32>,
}

impl Stroke {
    #[must_use]
    pub fn new(color: impl Into<String>, dash: Vec<u32>) -> Self {
        Self {
            color: color.into(),
            dash,
        }
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn dash(&self) -> &[u32] {
        &self.dash
    }

    #[must_use]
    pub fn dash_pattern(&self) -> String {
        self.dash
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parses a pattern string, dropping anything that is not a length.
    #[must_use]
    pub fn parse_dash(pattern: &str) -> Vec<u32> {
        pattern
            .split_whitespace()
            .filter_map(|piece| piece.parse().ok())
            .collect()
    }
}

impl Serializable for Stroke {
    fn type_tag(&self) -> TypeTag {
        TypeTag::new(STROKE_TAG)
    }

    fn properties(&self) -> Vec<(String, Value)> {
        Vec::new()
    }

    fn set_property(&mut self, _: &str, _: Value) {}

    fn custom_serialize(&self, id: &SerialId, _table: &mut IdentityTable) -> Option<Node> {
        let mut node = ObjectNode::new(id.clone(), self.type_tag());
        node.constructor_arguments = vec![
            ArgNode::Value(Node::Scalar(Scalar::Str(self.color.clone()))),
            ArgNode::Value(Node::Scalar(Scalar::Str(self.dash_pattern()))),
        ];
        Some(Node::Object(node))
    }
}

fn as_number(prim: &Prim) -> Option<f64> {
    match prim {
        #[allow(clippy::cast_precision_loss)]
        Prim::Int(v) => Some(*v as f64),
        Prim::Float(v) => Some(*v),
        _ => None,
    }
}

fn as_str(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::Prim(Prim::Str(s))) => Some(s),
        _ => None,
    }
}

/// Builds the registry covering every demo type.
pub fn demo_registry() -> ObjectRegistry {
    let mut registry = ObjectRegistry::new();
    registry
        .register(TypeTag::new(SHAPE_TAG), |args| {
            let mut args = args.into_iter();
            let kind = as_str(args.next()).ok_or(FactoryError::ArgType {
                index: 0,
                expected: "string",
            })?;
            let name = as_str(args.next()).ok_or(FactoryError::ArgType {
                index: 1,
                expected: "string",
            })?;
            let handle: ObjHandle = Rc::new(RefCell::new(Shape::new(kind, name)));
            Ok(handle)
        })
        .expect("fresh registry");
    registry
        .register(TypeTag::new(GROUP_TAG), |args| {
            let mut args = args.into_iter();
            let owner = args.next().ok_or(FactoryError::ArgCount {
                expected: 2,
                actual: 0,
            })?;
            let name = as_str(args.next()).ok_or(FactoryError::ArgType {
                index: 1,
                expected: "string",
            })?;
            let handle: ObjHandle = Rc::new(RefCell::new(Group::new(owner, name)));
            Ok(handle)
        })
        .expect("fresh registry");
    registry
        .register(TypeTag::new(STROKE_TAG), |args| {
            let mut args = args.into_iter();
            let color = as_str(args.next()).ok_or(FactoryError::ArgType {
                index: 0,
                expected: "string",
            })?;
            let pattern = as_str(args.next()).ok_or(FactoryError::ArgType {
                index: 1,
                expected: "string",
            })?;
            let handle: ObjHandle =
                Rc::new(RefCell::new(Stroke::new(color, Stroke::parse_dash(&pattern))));
            Ok(handle)
        })
        .expect("fresh registry");
    registry
}

/// Externals provider handing out the canvas document handle.
struct DocExternals {
    doc: Value,
}

impl ExternalArgs for DocExternals {
    fn next_external(&mut self, _tag: &TypeTag) -> Option<Value> {
        Some(self.doc.clone())
    }
}

/// The drawing surface: owns the entities and implements the host
/// boundary for history and project persistence.
pub struct Canvas {
    doc: Value,
    entities: Vec<(String, Value)>,
    registry: ObjectRegistry,
    viewport: Viewport,
    next_key: u64,
}

impl Canvas {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            doc: Value::array(vec![Value::str(name.into())]),
            entities: Vec::new(),
            registry: demo_registry(),
            viewport: Viewport::default(),
            next_key: 1,
        }
    }

    /// The shared document handle injected into groups as their owner.
    #[must_use]
    pub fn doc(&self) -> Value {
        self.doc.clone()
    }

    /// Adds an entity under a fresh key. Returns the key.
    pub fn add_entity(&mut self, entity: Value) -> String {
        let key = format!("e{}", self.next_key);
        self.next_key += 1;
        self.entities.push((key.clone(), entity));
        key
    }

    /// Adds a fresh shape, returning its key and a typed handle.
    pub fn add_shape(&mut self, kind: &str, name: &str) -> (String, Rc<RefCell<Shape>>) {
        let shape = Rc::new(RefCell::new(Shape::new(kind, name)));
        let key = self.add_entity(Value::object(Rc::clone(&shape)));
        (key, shape)
    }

    /// Adds a fresh group, returning its key and a typed handle.
    pub fn add_group(&mut self, name: &str) -> (String, Rc<RefCell<Group>>) {
        let group = Rc::new(RefCell::new(Group::new(self.doc(), name)));
        let key = self.add_entity(Value::object(Rc::clone(&group)));
        (key, group)
    }

    pub fn remove_entity(&mut self, key: &str) {
        self.entities.retain(|(k, _)| k != key);
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn set_zoom(&mut self, zoom: u32) {
        self.viewport.zoom = zoom;
    }

    pub fn select(&mut self, key: Option<String>) {
        self.viewport.selected = key;
    }
}

impl ProjectHost for Canvas {
    fn entity_order(&self) -> Vec<String> {
        self.entities.iter().map(|(k, _)| k.clone()).collect()
    }

    fn entity(&self, key: &str) -> Option<Value> {
        self.entities
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    fn external_args(&self) -> Box<dyn ExternalArgs> {
        Box::new(DocExternals { doc: self.doc() })
    }

    fn viewport(&self) -> Viewport {
        self.viewport.clone()
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn clear_entities(&mut self) {
        self.entities.clear();
    }

    fn attach_entity(&mut self, key: &str, entity: Value) {
        self.entities.push((key.to_owned(), entity));
        // Keep fresh keys ahead of anything a loaded project brought in.
        if let Some(n) = key.strip_prefix('e').and_then(|n| n.parse::<u64>().ok()) {
            self.next_key = self.next_key.max(n + 1);
        }
    }
}
