//! The tag-to-factory map.

use std::collections::BTreeMap;
use std::fmt;

use value::TypeTag;

use crate::error::{FactoryError, RegistryError, RegistryResult};

/// A constructor closure: takes the deserialized constructor arguments and
/// produces a live instance.
pub type Factory<A, T> = Box<dyn Fn(Vec<A>) -> Result<T, FactoryError>>;

/// Maps qualified type names to constructors.
///
/// `A` is the live argument type and `T` the live object handle type; the
/// graph crate instantiates both with its own value union so this crate
/// stays independent of the object model.
pub struct TypeRegistry<A, T> {
    factories: BTreeMap<TypeTag, Factory<A, T>>,
}

impl<A, T> TypeRegistry<A, T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers a constructor under a qualified name.
    ///
    /// Registering the same tag twice is an error: silently replacing a
    /// constructor would make load behavior depend on registration order.
    pub fn register(
        &mut self,
        tag: TypeTag,
        factory: impl Fn(Vec<A>) -> Result<T, FactoryError> + 'static,
    ) -> RegistryResult<()> {
        if self.factories.contains_key(&tag) {
            return Err(RegistryError::DuplicateTag { tag });
        }
        self.factories.insert(tag, Box::new(factory));
        Ok(())
    }

    /// Resolves a tag to its constructor. Unknown tags resolve to `None`.
    #[must_use]
    pub fn resolve(&self, tag: &TypeTag) -> Option<&Factory<A, T>> {
        self.factories.get(tag)
    }

    /// Returns `true` if the tag is registered.
    #[must_use]
    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.factories.contains_key(tag)
    }

    /// Returns the registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &TypeTag> {
        self.factories.keys()
    }

    /// Returns the number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no tags are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<A, T> Default for TypeRegistry<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T> fmt::Debug for TypeRegistry<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("tags", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
