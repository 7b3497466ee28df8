use crate::access::FromCapsule;
use crate::error::MapError;
use crate::map::CapsuleMap;
use crate::value::Value;
use std::sync::{Arc, Mutex};

/// A thread-safe handle to a [`CapsuleMap`]
///
/// `CapsuleMap` itself does no locking. `SharedCapsuleMap` puts one behind an
/// `Arc<Mutex<_>>` so several threads can use it, and holds the lock for the
/// whole traversal when deep-copying so no writer can interleave.
///
/// Cloning a `SharedCapsuleMap` yields another handle to the same map.
///
/// # Examples
///
/// ```
/// use capsule_map::{MapError, SharedCapsuleMap};
///
/// let shared = SharedCapsuleMap::new();
/// shared.set("visits", 1i32)?;
///
/// shared.with_mut("visits", |value| {
///     if let capsule_map::Value::Int(n) = value {
///         *n += 1;
///     }
/// })?;
///
/// let snapshot = shared.deep_copy()?;
/// assert_eq!(snapshot.get_int("visits"), Some(2));
/// # Ok::<(), MapError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedCapsuleMap {
    items: Arc<Mutex<CapsuleMap>>,
}

impl SharedCapsuleMap {
    /// Creates a new, empty shared map
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of an existing map
    pub fn from_map(map: CapsuleMap) -> Self {
        Self {
            items: Arc::new(Mutex::new(map)),
        }
    }

    /// Stores a value in the map
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>, MapError> {
        let mut map = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(map.set(key, value))
    }

    /// Retrieves a shallow clone of a value from the map
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    pub fn get(&self, key: &str) -> Result<Value, MapError> {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        map.get(key)
            .cloned()
            .ok_or_else(|| MapError::KeyNotFound(key.to_string()))
    }

    /// Reads an owned, typed value such as a scalar, a [`Size`](crate::Size)
    /// or a [`Capsule`](crate::Capsule)
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    /// - Returns `MapError::TypeMismatch` if the stored value cannot be read as `T`
    pub fn get_as<T>(&self, key: &str) -> Result<T, MapError>
    where
        T: for<'a> FromCapsule<'a>,
    {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        map.try_get_as::<T>(key)
    }

    /// Removes a value from the map
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    ///
    /// # Returns
    ///
    /// Returns the removed value, or `None` if the key was not present.
    pub fn remove(&self, key: &str) -> Result<Option<Value>, MapError> {
        let mut map = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(map.remove(key))
    }

    /// Returns true if the map contains the specified key
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn contains_key(&self, key: &str) -> Result<bool, MapError> {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(map.contains_key(key))
    }

    /// Returns all keys in ascending order
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn keys(&self) -> Result<Vec<String>, MapError> {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(map.keys())
    }

    /// Returns the number of entries in the map
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn len(&self) -> Result<usize, MapError> {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(map.len())
    }

    /// Returns true if the map contains no entries
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn is_empty(&self) -> Result<bool, MapError> {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(map.is_empty())
    }

    /// Gets a value by executing a closure with read access
    ///
    /// This allows inspecting borrowed views, such as a
    /// [`TypedList`](crate::TypedList), without cloning the stored value.
    ///
    /// # Examples
    ///
    /// ```
    /// use capsule_map::{MapError, SharedCapsuleMap, Value};
    ///
    /// let shared = SharedCapsuleMap::new();
    /// shared.set("numbers", vec![1i32, 2, 3])?;
    ///
    /// let length = shared.with("numbers", |value| match value {
    ///     Value::IntArray(v) => v.len(),
    ///     _ => 0,
    /// })?;
    /// assert_eq!(length, 3);
    /// # Ok::<(), MapError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    pub fn with<F, R>(&self, key: &str, f: F) -> Result<R, MapError>
    where
        F: FnOnce(&Value) -> R,
    {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        let value = map
            .get(key)
            .ok_or_else(|| MapError::KeyNotFound(key.to_string()))?;
        Ok(f(value))
    }

    /// Gets a value by executing a closure with write access
    ///
    /// # Errors
    ///
    /// - Returns `MapError::LockError` if the internal lock cannot be acquired
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    pub fn with_mut<F, R>(&self, key: &str, f: F) -> Result<R, MapError>
    where
        F: FnOnce(&mut Value) -> R,
    {
        let mut map = self.items.lock().map_err(|_| MapError::LockError)?;
        let value = map
            .get_mut(key)
            .ok_or_else(|| MapError::KeyNotFound(key.to_string()))?;
        Ok(f(value))
    }

    /// Runs a closure with read access to the whole map
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn with_map<F, R>(&self, f: F) -> Result<R, MapError>
    where
        F: FnOnce(&CapsuleMap) -> R,
    {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(f(&map))
    }

    /// Deep-copies the map while holding the lock
    ///
    /// # Errors
    ///
    /// Returns `MapError::LockError` if the internal lock cannot be acquired.
    pub fn deep_copy(&self) -> Result<CapsuleMap, MapError> {
        let map = self.items.lock().map_err(|_| MapError::LockError)?;
        Ok(map.deep_copy())
    }

    /// Returns the map if this is the last handle to it, or `self` otherwise
    ///
    /// Unlike the other operations this does not fail on a poisoned lock. No
    /// other handle remains to observe the map, so it is handed back as the
    /// panicking writer left it.
    pub fn into_inner(self) -> Result<CapsuleMap, Self> {
        match Arc::try_unwrap(self.items) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())),
            Err(items) => Err(Self { items }),
        }
    }
}

impl From<CapsuleMap> for SharedCapsuleMap {
    fn from(map: CapsuleMap) -> Self {
        Self::from_map(map)
    }
}
