use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// An opaque, process-local capability.
///
/// A handle wraps any `Send + Sync` object behind an `Arc`. It has no copyable
/// representation: cloning a handle, or deep-copying a map holding one, yields
/// the very same object. Equality is reference identity.
#[derive(Clone)]
pub struct Handle {
    type_id: TypeId,
    type_name: &'static str,
    object: Arc<dyn Any + Send + Sync>,
}

impl Handle {
    /// Wrap `object` in a fresh handle
    pub fn new<T: Any + Send + Sync>(object: T) -> Self {
        Self::from_arc(Arc::new(object))
    }

    /// Wrap an already shared object without re-allocating it
    pub fn from_arc<T: Any + Send + Sync>(object: Arc<T>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            object,
        }
    }

    /// Check if the wrapped object is of type T
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Get a reference to the wrapped object if it is of type T
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if both handles refer to the same object
    pub fn ptr_eq(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Handle {}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("type", &self.type_name)
            .field("ptr", &Arc::as_ptr(&self.object).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Binder;

    #[test]
    fn equality_is_identity() {
        let handle = Handle::new(Binder);
        let same = handle.clone();
        let other = Handle::new(Binder);
        assert_eq!(handle, same);
        assert_ne!(handle, other);
    }

    #[test]
    fn downcasts_to_wrapped_type() {
        let handle = Handle::new(7u32);
        assert!(handle.is::<u32>());
        assert!(!handle.is::<i32>());
        assert_eq!(handle.downcast_ref::<u32>(), Some(&7));
        assert!(handle.downcast_ref::<Binder>().is_none());
        assert_eq!(handle.type_name(), "u32");
    }

    #[test]
    fn from_arc_keeps_allocation() {
        let shared = Arc::new(Binder);
        let a = Handle::from_arc(Arc::clone(&shared));
        let b = Handle::from_arc(shared);
        assert_eq!(a, b);
    }
}
