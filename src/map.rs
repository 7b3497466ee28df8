use crate::access::{FromCapsule, TypedList};
use crate::capsule::{Capsule, SerialObject, SparseCapsuleArray};
use crate::copy;
use crate::error::MapError;
use crate::handle::Handle;
use crate::kind::Kind;
use crate::text::Text;
use crate::value::{Size, SizeF, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

macro_rules! scalar_accessors {
    ($($set:ident, $get:ident: $ty:ty => $variant:ident;)*) => {
        $(
            pub fn $set(&mut self, key: impl Into<String>, value: $ty) -> Option<Value> {
                self.insert(key.into(), Value::$variant(value))
            }

            pub fn $get(&self, key: &str) -> Option<$ty> {
                self.get_as::<$ty>(key)
            }
        )*
    };
}

macro_rules! array_accessors {
    ($($set:ident, $get:ident: $ty:ty => $variant:ident;)*) => {
        $(
            pub fn $set(&mut self, key: impl Into<String>, value: impl Into<Vec<$ty>>) -> Option<Value> {
                self.insert(key.into(), Value::$variant(value.into()))
            }

            pub fn $get(&self, key: &str) -> Option<&[$ty]> {
                self.get_as::<&[$ty]>(key)
            }
        )*
    };
}

/// A heterogeneous map from string keys to tagged values.
///
/// Every entry carries exactly one [`Kind`], pinned by the setter that stored
/// it. Typed getters check the stored kind's family and return `None` on a
/// mismatch rather than failing.
///
/// `Clone` is shallow: nested maps and every other shared object stay shared.
/// Use [`CapsuleMap::deep_copy`] for an independent copy.
///
/// # Examples
///
/// ```
/// use capsule_map::{CapsuleMap, Size};
///
/// let mut map = CapsuleMap::new();
/// map.set_int("count", 3);
/// map.set_size("icon", Size::new(48, 48));
///
/// let copy = map.deep_copy();
/// assert_eq!(copy.get_int("count"), Some(3));
/// assert_eq!(copy.get_size("icon"), Some(Size::new(48, 48)));
/// assert!(copy.get_size_f("icon").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapsuleMap {
    items: BTreeMap<String, Value>,
}

impl CapsuleMap {
    /// The descriptor reported when a map is viewed as a [`Capsule`].
    pub const DESCRIPTOR: &'static str = "CapsuleMap";

    /// Creates a new, empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `key`, replacing any previous entry.
    ///
    /// The value is normalized first: a capsule holding a map is stored as a
    /// map, and a serializable value holding text is stored as text.
    ///
    /// Returns the value previously stored under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.insert(key.into(), value.into().normalize())
    }

    /// Stores `value` as is, without normalizing it.
    pub(crate) fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        let kind = value.kind();
        let previous = self.items.insert(key, value);
        if let Some(old) = &previous {
            if old.kind() != kind {
                trace!(from = ?old.kind(), to = ?kind, "replaced value with a different kind");
            }
        }
        previous
    }

    scalar_accessors! {
        set_bool, get_bool: bool => Bool;
        set_byte, get_byte: i8 => Byte;
        set_short, get_short: i16 => Short;
        set_int, get_int: i32 => Int;
        set_long, get_long: i64 => Long;
        set_float, get_float: f32 => Float;
        set_double, get_double: f64 => Double;
        set_char, get_char: char => Char;
        set_size, get_size: Size => Size;
        set_size_f, get_size_f: SizeF => SizeF;
    }

    array_accessors! {
        set_bool_array, get_bool_array: bool => BoolArray;
        set_byte_array, get_byte_array: i8 => ByteArray;
        set_short_array, get_short_array: i16 => ShortArray;
        set_int_array, get_int_array: i32 => IntArray;
        set_long_array, get_long_array: i64 => LongArray;
        set_float_array, get_float_array: f32 => FloatArray;
        set_double_array, get_double_array: f64 => DoubleArray;
        set_char_array, get_char_array: char => CharArray;
    }

    /// Stores canonical text as-is, keeping its buffer shared with the caller.
    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<Text>) -> Option<Value> {
        self.insert(key.into(), Value::Text(value.into()))
    }

    /// Stores any char sequence, normalized to canonical [`Text`].
    pub fn set_char_sequence(
        &mut self,
        key: impl Into<String>,
        value: impl AsRef<str>,
    ) -> Option<Value> {
        self.insert(key.into(), Value::Text(Text::new(value)))
    }

    pub fn set_text_array<I, T>(&mut self, key: impl Into<String>, values: I) -> Option<Value>
    where
        I: IntoIterator<Item = T>,
        T: Into<Text>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.insert(key.into(), Value::TextArray(values))
    }

    pub fn set_text_list<I, T>(&mut self, key: impl Into<String>, values: I) -> Option<Value>
    where
        I: IntoIterator<Item = T>,
        T: Into<Text>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.insert(key.into(), Value::TextList(values))
    }

    pub fn set_integer_list(
        &mut self,
        key: impl Into<String>,
        values: impl Into<Vec<i32>>,
    ) -> Option<Value> {
        self.insert(key.into(), Value::IntegerList(values.into()))
    }

    pub fn set_handle(&mut self, key: impl Into<String>, handle: Handle) -> Option<Value> {
        self.insert(key.into(), Value::Handle(handle))
    }

    /// Nests a map. Accepts an owned map or one already shared in an `Arc`.
    pub fn set_map(
        &mut self,
        key: impl Into<String>,
        map: impl Into<Arc<CapsuleMap>>,
    ) -> Option<Value> {
        self.insert(key.into(), Value::Map(map.into()))
    }

    /// Stores a capsule. A capsule holding a map is stored as a nested map.
    pub fn set_capsule(&mut self, key: impl Into<String>, capsule: impl Into<Capsule>) -> Option<Value> {
        self.insert(key.into(), Value::Capsule(capsule.into()).normalize())
    }

    pub fn set_capsule_array(
        &mut self,
        key: impl Into<String>,
        capsules: impl Into<Vec<Capsule>>,
    ) -> Option<Value> {
        self.insert(key.into(), Value::CapsuleArray(capsules.into()))
    }

    pub fn set_capsule_list(
        &mut self,
        key: impl Into<String>,
        capsules: impl Into<Vec<Capsule>>,
    ) -> Option<Value> {
        self.insert(key.into(), Value::CapsuleList(capsules.into()))
    }

    pub fn set_sparse_capsule_array(
        &mut self,
        key: impl Into<String>,
        sparse: impl Into<Arc<SparseCapsuleArray>>,
    ) -> Option<Value> {
        self.insert(key.into(), Value::SparseCapsuleArray(sparse.into()))
    }

    /// Stores a generic serializable value. Text is stored as [`Kind::Text`].
    pub fn set_serializable(&mut self, key: impl Into<String>, value: SerialObject) -> Option<Value> {
        self.insert(key.into(), Value::Serializable(value).normalize())
    }

    /// Returns the stored value without any kind check
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    /// Returns mutable access to the stored value without any kind check.
    ///
    /// Replacing the value through this reference bypasses normalization.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.items.get_mut(key)
    }

    pub fn kind(&self, key: &str) -> Option<Kind> {
        self.items.get(key).map(Value::kind)
    }

    /// Reads the value under `key` as `T`.
    ///
    /// Returns `None` if the key is missing or the stored value is not of
    /// `T`'s family. List readers accept every stored list; see
    /// [`TypedList`].
    ///
    /// # Examples
    ///
    /// ```
    /// use capsule_map::{CapsuleMap, TypedList};
    ///
    /// let mut map = CapsuleMap::new();
    /// map.set_text_list("names", ["one", "two"]);
    ///
    /// // The list is handed back under any element type...
    /// let numbers = map.get_as::<TypedList<i32>>("names").unwrap();
    /// assert_eq!(numbers.len(), 2);
    /// // ...but its elements refuse to narrow.
    /// assert!(numbers.get(0).unwrap().is_err());
    ///
    /// // Arrays are a different family altogether.
    /// assert!(map.get_as::<&[i32]>("names").is_none());
    /// ```
    pub fn get_as<'a, T: FromCapsule<'a>>(&'a self, key: &str) -> Option<T> {
        let value = self.items.get(key)?;
        let typed = T::from_value(value);
        if typed.is_none() {
            debug!(
                key,
                expected = ?T::FAMILY,
                found = ?value.kind(),
                "capsule value read with mismatched kind"
            );
        }
        typed
    }

    /// Reads the value under `key` as `T`, or returns `default`
    pub fn get_or<'a, T: FromCapsule<'a>>(&'a self, key: &str, default: T) -> T {
        self.get_as(key).unwrap_or(default)
    }

    /// Strict variant of [`get_as`](Self::get_as).
    ///
    /// # Errors
    ///
    /// - Returns `MapError::KeyNotFound` if the key doesn't exist
    /// - Returns `MapError::TypeMismatch` if the stored value cannot be read as `T`
    pub fn try_get_as<'a, T: FromCapsule<'a>>(&'a self, key: &str) -> Result<T, MapError> {
        let value = self
            .items
            .get(key)
            .ok_or_else(|| MapError::KeyNotFound(key.to_string()))?;
        T::from_value(value).ok_or_else(|| MapError::TypeMismatch {
            key: key.to_string(),
            expected: T::FAMILY,
            found: value.kind(),
        })
    }

    pub fn get_text(&self, key: &str) -> Option<&Text> {
        self.get_as::<&Text>(key)
    }

    /// Same as [`get_text`](Self::get_text): every char sequence is stored
    /// as canonical text.
    pub fn get_char_sequence(&self, key: &str) -> Option<&Text> {
        self.get_text(key)
    }

    pub fn get_text_array(&self, key: &str) -> Option<&[Text]> {
        self.get_as::<&[Text]>(key)
    }

    pub fn get_text_list(&self, key: &str) -> Option<TypedList<'_, Text>> {
        self.get_as(key)
    }

    pub fn get_integer_list(&self, key: &str) -> Option<TypedList<'_, i32>> {
        self.get_as(key)
    }

    pub fn get_capsule_list(&self, key: &str) -> Option<TypedList<'_, Capsule>> {
        self.get_as(key)
    }

    pub fn get_handle(&self, key: &str) -> Option<&Handle> {
        self.get_as::<&Handle>(key)
    }

    pub fn get_map(&self, key: &str) -> Option<&CapsuleMap> {
        self.get_as::<&CapsuleMap>(key)
    }

    /// Reads a capsule. Nested maps are capsules too.
    pub fn get_capsule(&self, key: &str) -> Option<Capsule> {
        self.get_as::<Capsule>(key)
    }

    pub fn get_capsule_array(&self, key: &str) -> Option<&[Capsule]> {
        self.get_as::<&[Capsule]>(key)
    }

    pub fn get_sparse_capsule_array(&self, key: &str) -> Option<&SparseCapsuleArray> {
        self.get_as::<&SparseCapsuleArray>(key)
    }

    /// Returns the stored value if its kind is transportable by value
    /// encoding: scalars, scalar and text arrays, text, lists and
    /// [`SerialObject`]s.
    pub fn get_serializable(&self, key: &str) -> Option<&Value> {
        let value = self.items.get(key)?;
        if value.kind().is_serializable() {
            Some(value)
        } else {
            debug!(key, found = ?value.kind(), "capsule value is not serializable");
            None
        }
    }

    /// Removes the entry under `key`, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.items.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Returns all keys in ascending order
    pub fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.items.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Copies every entry of `other` into this map, overwriting on conflict.
    /// The copy is shallow, like [`Clone`].
    pub fn put_all(&mut self, other: &CapsuleMap) {
        for (key, value) in other.iter() {
            self.insert(key.to_string(), value.clone());
        }
    }

    /// Produces an independent copy of this map; see [`deep_copy`](crate::deep_copy).
    pub fn deep_copy(&self) -> CapsuleMap {
        copy::deep_copy(self)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CapsuleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = CapsuleMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for CapsuleMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_operations() {
        let mut map = CapsuleMap::new();
        assert!(map.is_empty());

        assert!(map.set_int("key", 42).is_none());
        assert!(map.contains_key("key"));
        assert_eq!(map.get_int("key"), Some(42));
        assert_eq!(map.kind("key"), Some(Kind::Int));

        // Replace with a value of a different kind
        assert_eq!(map.set_text("key", "new value"), Some(Value::Int(42)));
        assert_eq!(map.kind("key"), Some(Kind::Text));
        assert!(map.get_int("key").is_none());
        assert_eq!(map.get_text("key").map(Text::as_str), Some("new value"));

        assert!(map.remove("key").is_some());
        assert!(!map.contains_key("key"));
        assert!(map.remove("key").is_none());
    }

    #[test]
    fn keys_are_sorted() {
        let mut map = CapsuleMap::new();
        map.set_int("two", 2);
        map.set_int("one", 1);
        map.set_int("three", 3);
        assert_eq!(map.keys(), vec!["one", "three", "two"]);
        assert_eq!(map.len(), 3);
        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn scalars_do_not_widen() {
        let mut map = CapsuleMap::new();
        map.set_short("key", i16::MAX);
        assert_eq!(map.get_short("key"), Some(i16::MAX));
        assert!(map.get_int("key").is_none());
        assert!(map.get_long("key").is_none());
        assert!(map.get_float("key").is_none());
        assert!(map.get_double("key").is_none());
    }

    #[test]
    fn get_or_falls_back() {
        let mut map = CapsuleMap::new();
        map.set_long("long", 7);
        assert_eq!(map.get_or("missing", 'X'), 'X');
        assert_eq!(map.get_or("long", 0i32), 0);
        assert_eq!(map.get_or("long", 0i64), 7);
    }

    #[test]
    fn try_get_as_reports_errors() {
        let mut map = CapsuleMap::new();
        map.set_text_list("names", ["one"]);

        match map.try_get_as::<&[Text]>("names") {
            Err(MapError::TypeMismatch { expected, found, .. }) => {
                assert_eq!(expected, crate::Family::Array);
                assert_eq!(found, Kind::TextList);
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
        assert_eq!(
            map.try_get_as::<i32>("missing").unwrap_err(),
            MapError::KeyNotFound("missing".to_string())
        );
        assert!(map.try_get_as::<TypedList<i32>>("names").is_ok());
    }

    #[test]
    fn char_sequences_are_normalized() {
        let mut map = CapsuleMap::new();
        map.set_char_sequence("key", String::from("myCsValue"));
        assert_eq!(map.kind("key"), Some(Kind::Text));
        assert_eq!(map.get_text("key"), map.get_char_sequence("key"));
        assert_eq!(map.get_as::<&str>("key"), Some("myCsValue"));
    }

    #[test]
    fn capsules_holding_maps_are_stored_as_maps() {
        let mut map = CapsuleMap::new();
        map.set_capsule("nested", CapsuleMap::new());
        assert_eq!(map.kind("nested"), Some(Kind::Map));
        assert!(map.get_map("nested").is_some());
        assert!(map.get_capsule("nested").is_some());
    }

    #[test]
    fn serializable_family() {
        let mut map = CapsuleMap::new();
        map.set_bool("bool", true);
        map.set_bool_array("bools", [true, false]);
        map.set_text_list("list", ["one"]);
        map.set_size("size", Size::new(1, 1));
        map.set_map("map", CapsuleMap::new());

        assert!(map.get_serializable("bool").is_some());
        assert!(map.get_serializable("bools").is_some());
        assert!(map.get_serializable("list").is_some());
        assert!(map.get_serializable("size").is_none());
        assert!(map.get_serializable("map").is_none());
    }

    #[test]
    fn put_all_and_collect() {
        let mut map: CapsuleMap = [("a", Value::Int(1)), ("b", Value::Bool(true))]
            .into_iter()
            .collect();
        let other: CapsuleMap = [("b", 2i64)].into_iter().collect();
        map.put_all(&other);
        assert_eq!(map.get_int("a"), Some(1));
        assert_eq!(map.get_long("b"), Some(2));
        assert!(map.get_bool("b").is_none());
    }

    #[test]
    fn clone_is_shallow() {
        let mut inner = CapsuleMap::new();
        inner.set_int("depth", 1);
        let mut map = CapsuleMap::new();
        map.set_map("inner", inner);

        let cloned = map.clone();
        let a = map.get_map("inner").expect("nested map");
        let b = cloned.get_map("inner").expect("nested map");
        assert!(std::ptr::eq(a, b));
    }
}
