//! The per-pass identity table.

use std::collections::HashMap;
use std::rc::Rc;

use value::SerialId;

use crate::object::Value;

/// Maps object identity to object for exactly one top-level serialize or
/// deserialize call tree.
///
/// A fresh table must be created per pass and dropped afterwards: nothing
/// is stamped onto live objects, so dropping the table is the cleanup. A
/// table leaked across passes would treat unrelated objects as
/// already-visited references.
///
/// On the serialize side objects are keyed by allocation pointer; on the
/// deserialize side by the identity read from the node.
#[derive(Debug, Default)]
pub struct IdentityTable {
    next: u64,
    by_ptr: HashMap<usize, SerialId>,
    by_id: HashMap<SerialId, Value>,
}

impl IdentityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identity previously assigned to this live instance, if
    /// any. Primitives and handles have no identity.
    #[must_use]
    pub fn id_of(&self, value: &Value) -> Option<&SerialId> {
        ptr_key(value).and_then(|key| self.by_ptr.get(&key))
    }

    /// Registers a live instance, assigning a fresh identity if it has
    /// none. Must be called before any of the instance's properties are
    /// traversed; that ordering is what breaks cycles.
    pub fn register(&mut self, value: &Value) -> SerialId {
        let Some(key) = ptr_key(value) else {
            // Identity-less values cannot recurse into themselves; mint a
            // throwaway id so callers need not special-case them.
            return self.fresh_id();
        };
        if let Some(id) = self.by_ptr.get(&key) {
            return id.clone();
        }
        let id = self.fresh_id();
        self.by_ptr.insert(key, id.clone());
        self.by_id.insert(id.clone(), value.clone());
        id
    }

    /// Registers a reconstructed instance under the identity read from its
    /// node. Must happen before the instance's properties are populated.
    pub fn insert(&mut self, id: SerialId, value: Value) {
        // Keep fresh ids from ever colliding with an explicitly inserted
        // one (inert raw nodes re-enter a later pass with their old ids).
        if let Some(n) = id.as_str().strip_prefix('o').and_then(|s| s.parse::<u64>().ok()) {
            self.next = self.next.max(n);
        }
        if let Some(key) = ptr_key(&value) {
            self.by_ptr.insert(key, id.clone());
        }
        self.by_id.insert(id, value);
    }

    /// Resolves an identity to the live instance materialized under it.
    #[must_use]
    pub fn lookup(&self, id: &SerialId) -> Option<Value> {
        self.by_id.get(id).cloned()
    }

    /// Returns `true` if the identity is registered.
    #[must_use]
    pub fn contains(&self, id: &SerialId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns the number of registered identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn fresh_id(&mut self) -> SerialId {
        self.next += 1;
        SerialId::nth(self.next)
    }
}

fn ptr_key(value: &Value) -> Option<usize> {
    match value {
        Value::Object(o) => Some(Rc::as_ptr(o).cast::<()>() as usize),
        Value::Array(a) => Some(Rc::as_ptr(a).cast::<()>() as usize),
        Value::Raw(raw) => Some(Rc::as_ptr(raw).cast::<()>() as usize),
        Value::Prim(_) | Value::Handle => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_each_instance_one_id() {
        let mut table = IdentityTable::new();
        let a = Value::array(vec![Value::int(1)]);
        let id1 = table.register(&a);
        let id2 = table.register(&a);
        assert_eq!(id1, id2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_instances_get_distinct_ids() {
        let mut table = IdentityTable::new();
        let a = Value::array(Vec::new());
        let b = Value::array(Vec::new());
        assert_ne!(table.register(&a), table.register(&b));
    }

    #[test]
    fn id_of_unseen_instance_is_none() {
        let table = IdentityTable::new();
        let a = Value::array(Vec::new());
        assert!(table.id_of(&a).is_none());
    }

    #[test]
    fn clone_of_a_handle_shares_identity() {
        let mut table = IdentityTable::new();
        let a = Value::array(Vec::new());
        let id = table.register(&a);
        let alias = a.clone();
        assert_eq!(table.id_of(&alias), Some(&id));
    }

    #[test]
    fn insert_then_lookup_resolves_same_instance() {
        let mut table = IdentityTable::new();
        let a = Value::array(vec![Value::int(7)]);
        table.insert(SerialId::new("x1"), a.clone());
        let found = table.lookup(&SerialId::new("x1")).unwrap();
        assert!(found.same_instance(&a));
        assert!(table.contains(&SerialId::new("x1")));
        assert!(!table.contains(&SerialId::new("x2")));
    }

    #[test]
    fn primitives_have_no_identity() {
        let table = IdentityTable::new();
        assert!(table.id_of(&Value::int(3)).is_none());
        assert!(table.id_of(&Value::Handle).is_none());
    }
}
