//! The deep-copy engine.
//!
//! Every entry is routed through its kind's [`CopyPolicy`]:
//!
//! | policy | kinds | result |
//! |---|---|---|
//! | `ValueCopy` | scalars, `Size`, `SizeF` | the same value |
//! | `ShallowContainer` | arrays and lists | a new container sharing its elements |
//! | `Identity` | text, handles, non-map capsules, sparse arrays, serializables | the very same object |
//! | `Recursive` | nested maps | a deep copy of the nested map |
//!
//! Capsule arrays and lists are shallow even when an element is a map.
//! Entries are copied without normalization, so every key keeps its kind.

use crate::capsule::Capsule;
use crate::kind::CopyPolicy;
use crate::map::CapsuleMap;
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Produces a new map holding a copy of every entry of `source`.
///
/// The result has the same keys with the same kinds. Arrays and lists are
/// new containers, so resizing or overwriting them on one side leaves the
/// other untouched. Nested maps are copied recursively and are never the
/// same instance as in `source`. Everything without a generic clone keeps
/// its identity.
///
/// # Examples
///
/// ```
/// use capsule_map::{deep_copy, CapsuleMap, Handle, Value};
///
/// struct Binder;
///
/// let mut map = CapsuleMap::new();
/// map.set_int_array("ints", [i32::MIN, i32::MAX]);
/// map.set_handle("binder", Handle::new(Binder));
///
/// let mut copy = deep_copy(&map);
/// if let Some(Value::IntArray(ints)) = copy.get_mut("ints") {
///     ints[0] = 0;
/// }
///
/// assert_eq!(map.get_int_array("ints"), Some(&[i32::MIN, i32::MAX][..]));
/// assert_eq!(copy.get_handle("binder"), map.get_handle("binder"));
/// ```
pub fn deep_copy(source: &CapsuleMap) -> CapsuleMap {
    copy_map(source, 0)
}

fn copy_map(source: &CapsuleMap, depth: usize) -> CapsuleMap {
    debug!(entries = source.len(), depth, "deep copying capsule map");
    let mut copy = CapsuleMap::new();
    for (key, value) in source.iter() {
        let kind = value.kind();
        trace!(key, ?kind, policy = ?kind.copy_policy(), "copying entry");
        copy.insert(key.to_string(), copy_value(value, depth));
    }
    copy
}

fn copy_value(value: &Value, depth: usize) -> Value {
    match value {
        Value::Bool(v) => Value::Bool(*v),
        Value::Byte(v) => Value::Byte(*v),
        Value::Short(v) => Value::Short(*v),
        Value::Int(v) => Value::Int(*v),
        Value::Long(v) => Value::Long(*v),
        Value::Float(v) => Value::Float(*v),
        Value::Double(v) => Value::Double(*v),
        Value::Char(v) => Value::Char(*v),
        Value::Size(v) => Value::Size(*v),
        Value::SizeF(v) => Value::SizeF(*v),

        Value::BoolArray(v) => Value::BoolArray(v.clone()),
        Value::ByteArray(v) => Value::ByteArray(v.clone()),
        Value::ShortArray(v) => Value::ShortArray(v.clone()),
        Value::IntArray(v) => Value::IntArray(v.clone()),
        Value::LongArray(v) => Value::LongArray(v.clone()),
        Value::FloatArray(v) => Value::FloatArray(v.clone()),
        Value::DoubleArray(v) => Value::DoubleArray(v.clone()),
        Value::CharArray(v) => Value::CharArray(v.clone()),
        Value::TextArray(v) => Value::TextArray(v.clone()),
        Value::TextList(v) => Value::TextList(v.clone()),
        Value::IntegerList(v) => Value::IntegerList(v.clone()),
        Value::CapsuleArray(v) => Value::CapsuleArray(v.clone()),
        Value::CapsuleList(v) => Value::CapsuleList(v.clone()),

        Value::Text(v) => Value::Text(v.clone()),
        Value::Handle(v) => Value::Handle(v.clone()),
        Value::SparseCapsuleArray(v) => Value::SparseCapsuleArray(Arc::clone(v)),
        Value::Serializable(v) => Value::Serializable(v.clone()),

        Value::Map(map) => Value::Map(Arc::new(copy_map(map, depth + 1))),
        Value::Capsule(Capsule::Map(map)) => {
            Value::Capsule(Capsule::Map(Arc::new(copy_map(map, depth + 1))))
        }
        Value::Capsule(Capsule::Object(object)) => {
            Value::Capsule(Capsule::Object(Arc::clone(object)))
        }
    }
}

/// The policy [`deep_copy`] applies to `value`.
pub fn policy_of(value: &Value) -> CopyPolicy {
    match value {
        Value::Capsule(Capsule::Map(_)) => CopyPolicy::Recursive,
        other => other.kind().copy_policy(),
    }
}
