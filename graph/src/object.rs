//! The live object model: the contract domain types implement to
//! participate in the graph.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use value::{Node, ObjectNode, Prim, SerialId, TypeTag};

use crate::identity::IdentityTable;

/// A shared handle to a live domain object.
pub type ObjHandle = Rc<RefCell<dyn Serializable>>;

/// A shared handle to a live array.
pub type ArrayHandle = Rc<RefCell<LiveArray>>;

/// The contract a domain type implements to participate in the graph.
///
/// This replaces the original system's runtime property enumeration with an
/// explicit declaration: `properties` returns the ordered field list (the
/// ignore list is simply whatever a type chooses not to return), and
/// `set_property` is the explicit setter seam the deserializer calls in
/// `propertyOrder`.
pub trait Serializable {
    /// The qualified type name used to tag serialized nodes.
    fn type_tag(&self) -> TypeTag;

    /// Arguments needed to re-invoke the constructor. Arguments marked
    /// [`CtorArg::External`] are omitted from the encoding and injected by
    /// the caller at reconstruction time.
    fn constructor_args(&self) -> Vec<CtorArg> {
        Vec::new()
    }

    /// The reflectable properties, in serialization order. Anything not
    /// returned here is ignored by the generic walk.
    fn properties(&self) -> Vec<(String, Value)>;

    /// Applies one reconstructed property. Called in `propertyOrder`, so an
    /// implementation may derive state from properties applied earlier.
    fn set_property(&mut self, name: &str, value: Value);

    /// When `true`, the object serializes to nothing and is omitted from
    /// its parent entirely.
    fn skip_serialization(&self) -> bool {
        false
    }

    /// Opt-out of the generic walk: return a complete node to use instead.
    ///
    /// Called after identity bookkeeping, with the identity this object was
    /// registered under. Implementations that serialize nested objects must
    /// route them through [`crate::serialize_value`] with the same table.
    fn custom_serialize(&self, _id: &SerialId, _table: &mut IdentityTable) -> Option<Node> {
        let _ = self;
        None
    }
}

/// One constructor argument as reported by [`Serializable::constructor_args`].
#[derive(Clone)]
pub enum CtorArg {
    /// Serialized along with the node.
    Value(Value),
    /// Supplied externally by the deserializing caller (e.g. a back-reference
    /// to an owning container that is not part of the serialized subtree).
    External,
}

/// A live property value.
#[derive(Clone)]
pub enum Value {
    /// A primitive, including the JSON-unrepresentable specials.
    Prim(Prim),
    /// A domain object participating in the graph.
    Object(ObjHandle),
    /// An array with positional items and optional extra named properties.
    Array(ArrayHandle),
    /// An environment/UI handle. Never serialized; omitted from the parent.
    Handle,
    /// Inert data carried through from a node whose type tag could not be
    /// resolved. Survives a further round trip unchanged.
    Raw(Rc<ObjectNode>),
}

impl Value {
    /// Wraps a typed object handle.
    #[must_use]
    pub fn object<T: Serializable + 'static>(handle: Rc<RefCell<T>>) -> Self {
        Self::Object(handle)
    }

    /// Wraps an array of plain items.
    #[must_use]
    pub fn array(items: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(LiveArray::from_items(items))))
    }

    #[must_use]
    pub fn null() -> Self {
        Self::Prim(Prim::Null)
    }

    #[must_use]
    pub fn int(v: i64) -> Self {
        Self::Prim(Prim::Int(v))
    }

    #[must_use]
    pub fn float(v: f64) -> Self {
        Self::Prim(Prim::Float(v))
    }

    #[must_use]
    pub fn str(v: impl Into<String>) -> Self {
        Self::Prim(Prim::Str(v.into()))
    }

    /// Returns the primitive if this value is one.
    #[must_use]
    pub fn as_prim(&self) -> Option<&Prim> {
        match self {
            Self::Prim(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the object handle if this value is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjHandle> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the array handle if this value is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayHandle> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns `true` if two values are the same live instance (pointer
    /// identity for objects and arrays, never true for primitives).
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Raw(a), Self::Raw(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prim(p) => write!(f, "Prim({p:?})"),
            Self::Object(o) => match o.try_borrow() {
                Ok(o) => write!(f, "Object({})", o.type_tag()),
                Err(_) => write!(f, "Object(<borrowed>)"),
            },
            Self::Array(a) => match a.try_borrow() {
                Ok(a) => write!(f, "Array(len {})", a.items.len()),
                Err(_) => write!(f, "Array(<borrowed>)"),
            },
            Self::Handle => write!(f, "Handle"),
            Self::Raw(raw) => write!(f, "Raw({})", raw.class_name),
        }
    }
}

/// A live array: ordered items plus any extra named properties attached to
/// the array instance. Both survive a round trip.
#[derive(Debug, Clone, Default)]
pub struct LiveArray {
    pub items: Vec<Value>,
    pub extras: Vec<(String, Value)>,
}

impl LiveArray {
    /// Creates an array from positional items.
    #[must_use]
    pub fn from_items(items: Vec<Value>) -> Self {
        Self {
            items,
            extras: Vec::new(),
        }
    }

    /// Sets a positional item, padding any gap with nulls.
    pub fn set_index(&mut self, index: usize, value: Value) {
        if index >= self.items.len() {
            self.items.resize_with(index + 1, Value::null);
        }
        self.items[index] = value;
    }

    /// Attaches or replaces an extra named property.
    pub fn set_extra(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.extras.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.extras.push((name, value));
        }
    }

    /// Looks up an extra named property.
    #[must_use]
    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.extras
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_index_pads_gaps_with_null() {
        let mut array = LiveArray::default();
        array.set_index(2, Value::int(9));
        assert_eq!(array.items.len(), 3);
        assert!(matches!(array.items[0], Value::Prim(Prim::Null)));
        assert!(matches!(array.items[2], Value::Prim(Prim::Int(9))));
    }

    #[test]
    fn set_extra_replaces_existing() {
        let mut array = LiveArray::default();
        array.set_extra("tag", Value::str("a"));
        array.set_extra("tag", Value::str("b"));
        assert_eq!(array.extras.len(), 1);
        let Some(Value::Prim(Prim::Str(s))) = array.extra("tag") else {
            panic!("expected string extra");
        };
        assert_eq!(s, "b");
    }

    #[test]
    fn same_instance_is_pointer_identity() {
        let a = Value::array(vec![Value::int(1)]);
        let b = a.clone();
        let c = Value::array(vec![Value::int(1)]);
        assert!(a.same_instance(&b));
        assert!(!a.same_instance(&c));
        assert!(!Value::int(1).same_instance(&Value::int(1)));
    }

    #[test]
    fn value_accessors() {
        assert!(Value::int(1).as_prim().is_some());
        assert!(Value::int(1).as_object().is_none());
        assert!(Value::array(Vec::new()).as_array().is_some());
    }
}
