use crate::map::CapsuleMap;
use crate::text::Text;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// A self-describing object that can be stored as a capsule.
///
/// There is no generic way to clone a transportable object, so a deep copy
/// keeps referring to the same instance.
pub trait Transportable: Any + Debug + Send + Sync {
    /// A tag naming the concrete type, used by transport layers.
    fn descriptor(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// A polymorphic capsule: either a nested [`CapsuleMap`] or an arbitrary
/// [`Transportable`] object.
///
/// Cloning a capsule never copies the payload, both variants are shared
/// through an `Arc`.
#[derive(Debug, Clone)]
pub enum Capsule {
    Map(Arc<CapsuleMap>),
    Object(Arc<dyn Transportable>),
}

impl Capsule {
    pub fn new<T: Transportable>(object: T) -> Self {
        Capsule::Object(Arc::new(object))
    }

    pub fn from_map(map: CapsuleMap) -> Self {
        Capsule::Map(Arc::new(map))
    }

    pub fn descriptor(&self) -> &str {
        match self {
            Capsule::Map(_) => CapsuleMap::DESCRIPTOR,
            Capsule::Object(object) => object.descriptor(),
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Capsule::Map(_))
    }

    pub fn as_map(&self) -> Option<&CapsuleMap> {
        match self {
            Capsule::Map(map) => Some(map),
            Capsule::Object(_) => None,
        }
    }

    /// Downcast a transportable object to its concrete type
    pub fn downcast_ref<T: Transportable>(&self) -> Option<&T> {
        match self {
            Capsule::Map(_) => None,
            Capsule::Object(object) => object.as_any().downcast_ref::<T>(),
        }
    }

    /// Returns true if both capsules refer to the same instance
    pub fn ptr_eq(&self, other: &Capsule) -> bool {
        match (self, other) {
            (Capsule::Map(a), Capsule::Map(b)) => Arc::ptr_eq(a, b),
            (Capsule::Object(a), Capsule::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

/// Nested maps compare by content, objects by identity.
impl PartialEq for Capsule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Capsule::Map(a), Capsule::Map(b)) => a == b,
            (Capsule::Object(_), Capsule::Object(_)) => self.ptr_eq(other),
            _ => false,
        }
    }
}

impl From<CapsuleMap> for Capsule {
    fn from(map: CapsuleMap) -> Self {
        Capsule::from_map(map)
    }
}

impl From<Arc<CapsuleMap>> for Capsule {
    fn from(map: Arc<CapsuleMap>) -> Self {
        Capsule::Map(map)
    }
}

/// A sparse array of capsules keyed by small non-negative indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseCapsuleArray {
    items: BTreeMap<usize, Capsule>,
}

impl SparseCapsuleArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `capsule` at `index`, returning whatever was there before.
    pub fn insert(&mut self, index: usize, capsule: impl Into<Capsule>) -> Option<Capsule> {
        self.items.insert(index, capsule.into())
    }

    pub fn get(&self, index: usize) -> Option<&Capsule> {
        self.items.get(&index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Capsule> {
        self.items.remove(&index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates entries in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Capsule)> {
        self.items.iter().map(|(index, capsule)| (*index, capsule))
    }
}

impl FromIterator<(usize, Capsule)> for SparseCapsuleArray {
    fn from_iter<I: IntoIterator<Item = (usize, Capsule)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// A value that is only known to be transportable by value encoding.
pub trait Serializable: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Returns the value as canonical text when it is one.
    fn as_text(&self) -> Option<&Text> {
        None
    }
}

impl Serializable for Text {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_text(&self) -> Option<&Text> {
        Some(self)
    }
}

/// A shared [`Serializable`] object. Equality is reference identity.
#[derive(Debug, Clone)]
pub struct SerialObject(Arc<dyn Serializable>);

impl SerialObject {
    pub fn new<T: Serializable>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn from_arc(value: Arc<dyn Serializable>) -> Self {
        Self(value)
    }

    pub fn as_text(&self) -> Option<&Text> {
        self.0.as_text()
    }

    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &SerialObject) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl PartialEq for SerialObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
