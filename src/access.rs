//! Family-checked conversions out of a stored [`Value`].
//!
//! Scalars, arrays and sizes must match their stored kind exactly. Lists only
//! remember that they are lists: any list getter accepts any stored list and
//! hands back a [`TypedList`] whose elements are narrowed on access.

use crate::capsule::{Capsule, SparseCapsuleArray};
use crate::error::MapError;
use crate::handle::Handle;
use crate::kind::{Family, Kind};
use crate::map::CapsuleMap;
use crate::text::Text;
use crate::value::{Size, SizeF, Value};
use std::marker::PhantomData;

/// A type that can be read out of a [`CapsuleMap`] entry.
pub trait FromCapsule<'a>: Sized {
    /// The family this reader accepts.
    const FAMILY: Family;

    /// Returns `None` when the stored value cannot be read as `Self`.
    fn from_value(value: &'a Value) -> Option<Self>;
}

macro_rules! exact {
    ($family:ident: $($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> FromCapsule<'a> for $ty {
                const FAMILY: Family = Family::$family;

                fn from_value(value: &'a Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! exact_slice {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> FromCapsule<'a> for &'a [$ty] {
                const FAMILY: Family = Family::Array;

                fn from_value(value: &'a Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

exact! {
    Scalar:
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
}

exact! {
    Size:
    Size => Size,
    SizeF => SizeF,
}

exact_slice! {
    bool => BoolArray,
    i8 => ByteArray,
    i16 => ShortArray,
    i32 => IntArray,
    i64 => LongArray,
    f32 => FloatArray,
    f64 => DoubleArray,
    char => CharArray,
    Text => TextArray,
    Capsule => CapsuleArray,
}

impl<'a> FromCapsule<'a> for &'a Text {
    const FAMILY: Family = Family::Text;

    fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl<'a> FromCapsule<'a> for &'a str {
    const FAMILY: Family = Family::Text;

    fn from_value(value: &'a Value) -> Option<Self> {
        <&'a Text as FromCapsule<'a>>::from_value(value).map(Text::as_str)
    }
}

impl<'a> FromCapsule<'a> for &'a Handle {
    const FAMILY: Family = Family::Handle;

    fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Handle(handle) => Some(handle),
            _ => None,
        }
    }
}

/// A capsule holding a map is still a map, even when stored unnormalized.
impl<'a> FromCapsule<'a> for &'a CapsuleMap {
    const FAMILY: Family = Family::Map;

    fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Map(map) | Value::Capsule(Capsule::Map(map)) => Some(&**map),
            _ => None,
        }
    }
}

/// A nested map is one concrete capsule, so it reads back through here too.
impl<'a> FromCapsule<'a> for Capsule {
    const FAMILY: Family = Family::Capsule;

    fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Map(map) => Some(Capsule::Map(map.clone())),
            Value::Capsule(capsule) => Some(capsule.clone()),
            _ => None,
        }
    }
}

impl<'a> FromCapsule<'a> for &'a SparseCapsuleArray {
    const FAMILY: Family = Family::SparseArray;

    fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::SparseCapsuleArray(sparse) => Some(sparse),
            _ => None,
        }
    }
}

impl<'a, T: ListElement + 'a> FromCapsule<'a> for TypedList<'a, T> {
    const FAMILY: Family = Family::List;

    fn from_value(value: &'a Value) -> Option<Self> {
        let items = match value {
            Value::TextList(items) => ListSlice::Text(items),
            Value::IntegerList(items) => ListSlice::Integer(items),
            Value::CapsuleList(items) => ListSlice::Capsule(items),
            _ => return None,
        };
        Some(TypedList {
            items,
            _element: PhantomData,
        })
    }
}

/// The stored contents of a list, whatever its element type.
#[derive(Debug, Clone, Copy)]
pub enum ListSlice<'a> {
    Text(&'a [Text]),
    Integer(&'a [i32]),
    Capsule(&'a [Capsule]),
}

impl ListSlice<'_> {
    fn len(&self) -> usize {
        match self {
            ListSlice::Text(items) => items.len(),
            ListSlice::Integer(items) => items.len(),
            ListSlice::Capsule(items) => items.len(),
        }
    }

    fn element_name(&self) -> &'static str {
        match self {
            ListSlice::Text(_) => Text::NAME,
            ListSlice::Integer(_) => i32::NAME,
            ListSlice::Capsule(_) => Capsule::NAME,
        }
    }
}

/// An element type a list can hold.
pub trait ListElement: Sized {
    const NAME: &'static str;

    fn narrow(items: ListSlice<'_>) -> Option<&[Self]>;
}

impl ListElement for Text {
    const NAME: &'static str = "text";

    fn narrow(items: ListSlice<'_>) -> Option<&[Self]> {
        match items {
            ListSlice::Text(items) => Some(items),
            _ => None,
        }
    }
}

impl ListElement for i32 {
    const NAME: &'static str = "integer";

    fn narrow(items: ListSlice<'_>) -> Option<&[Self]> {
        match items {
            ListSlice::Integer(items) => Some(items),
            _ => None,
        }
    }
}

impl ListElement for Capsule {
    const NAME: &'static str = "capsule";

    fn narrow(items: ListSlice<'_>) -> Option<&[Self]> {
        match items {
            ListSlice::Capsule(items) => Some(items),
            _ => None,
        }
    }
}

/// A list read back under a requested element type `T`.
///
/// Obtaining the view never fails for a stored list. Reading an element whose
/// stored type is not `T` yields [`MapError::ElementMismatch`].
#[derive(Debug)]
pub struct TypedList<'a, T> {
    items: ListSlice<'a>,
    _element: PhantomData<T>,
}

impl<T> Clone for TypedList<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedList<'_, T> {}

impl<'a, T: ListElement + 'a> TypedList<'a, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The kind the list was stored as.
    pub fn stored_kind(&self) -> Kind {
        match self.items {
            ListSlice::Text(_) => Kind::TextList,
            ListSlice::Integer(_) => Kind::IntegerList,
            ListSlice::Capsule(_) => Kind::CapsuleList,
        }
    }

    pub fn raw(&self) -> ListSlice<'a> {
        self.items
    }

    /// Narrows the whole list. An empty list narrows to any element type.
    pub fn as_slice(&self) -> Result<&'a [T], MapError> {
        if self.is_empty() {
            return Ok(Default::default());
        }
        T::narrow(self.items).ok_or_else(|| self.mismatch(0))
    }

    /// Returns `None` past the end of the list.
    pub fn get(&self, index: usize) -> Option<Result<&'a T, MapError>> {
        if index >= self.len() {
            return None;
        }
        Some(
            T::narrow(self.items)
                .map(|items| &items[index])
                .ok_or_else(|| self.mismatch(index)),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<&'a T, MapError>> + 'a {
        let this = *self;
        (0..self.len()).map(move |index| match T::narrow(this.items) {
            Some(items) => Ok(&items[index]),
            None => Err(this.mismatch(index)),
        })
    }

    pub fn to_vec(&self) -> Result<Vec<T>, MapError>
    where
        T: Clone,
    {
        self.as_slice().map(<[T]>::to_vec)
    }

    /// Returns true if every element of `other` is also in this list.
    /// Elements that cannot be narrowed never match.
    pub fn contains_all(&self, other: &TypedList<'_, T>) -> bool
    where
        T: PartialEq,
    {
        if other.is_empty() {
            return true;
        }
        match (self.as_slice(), other.as_slice()) {
            (Ok(mine), Ok(theirs)) => theirs.iter().all(|item| mine.contains(item)),
            _ => false,
        }
    }

    fn mismatch(&self, index: usize) -> MapError {
        MapError::ElementMismatch {
            index,
            expected: T::NAME,
            found: self.items.element_name(),
        }
    }
}
