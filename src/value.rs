use crate::capsule::{Capsule, SerialObject, SparseCapsuleArray};
use crate::handle::Handle;
use crate::kind::Kind;
use crate::map::CapsuleMap;
use crate::text::Text;
use std::fmt;
use std::sync::Arc;

/// An immutable integer width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An immutable floating point width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for SizeF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A tagged value stored in a [`CapsuleMap`].
///
/// The variant is the value's [`Kind`]. Cloning a value is shallow: arrays
/// and lists are duplicated but everything behind an `Arc` is shared.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    BoolArray(Vec<bool>),
    ByteArray(Vec<i8>),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    CharArray(Vec<char>),
    Text(Text),
    TextArray(Vec<Text>),
    TextList(Vec<Text>),
    IntegerList(Vec<i32>),
    Handle(Handle),
    Map(Arc<CapsuleMap>),
    Capsule(Capsule),
    CapsuleArray(Vec<Capsule>),
    CapsuleList(Vec<Capsule>),
    SparseCapsuleArray(Arc<SparseCapsuleArray>),
    Serializable(SerialObject),
    Size(Size),
    SizeF(SizeF),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Byte(_) => Kind::Byte,
            Value::Short(_) => Kind::Short,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::Char(_) => Kind::Char,
            Value::BoolArray(_) => Kind::BoolArray,
            Value::ByteArray(_) => Kind::ByteArray,
            Value::ShortArray(_) => Kind::ShortArray,
            Value::IntArray(_) => Kind::IntArray,
            Value::LongArray(_) => Kind::LongArray,
            Value::FloatArray(_) => Kind::FloatArray,
            Value::DoubleArray(_) => Kind::DoubleArray,
            Value::CharArray(_) => Kind::CharArray,
            Value::Text(_) => Kind::Text,
            Value::TextArray(_) => Kind::TextArray,
            Value::TextList(_) => Kind::TextList,
            Value::IntegerList(_) => Kind::IntegerList,
            Value::Handle(_) => Kind::Handle,
            Value::Map(_) => Kind::Map,
            Value::Capsule(_) => Kind::Capsule,
            Value::CapsuleArray(_) => Kind::CapsuleArray,
            Value::CapsuleList(_) => Kind::CapsuleList,
            Value::SparseCapsuleArray(_) => Kind::SparseCapsuleArray,
            Value::Serializable(_) => Kind::Serializable,
            Value::Size(_) => Kind::Size,
            Value::SizeF(_) => Kind::SizeF,
        }
    }

    /// Brings a value into its canonical stored form.
    ///
    /// A capsule wrapping a map is stored as a map, and a serializable value
    /// that is really text is stored as text.
    pub(crate) fn normalize(self) -> Self {
        match self {
            Value::Capsule(Capsule::Map(map)) => Value::Map(map),
            Value::Serializable(object) => match object.as_text() {
                Some(text) => Value::Text(text.clone()),
                None => Value::Serializable(object),
            },
            other => other,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    Vec<bool> => BoolArray,
    Vec<i8> => ByteArray,
    Vec<i16> => ShortArray,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Vec<char> => CharArray,
    Text => Text,
    Vec<Text> => TextArray,
    Handle => Handle,
    Arc<CapsuleMap> => Map,
    Capsule => Capsule,
    Vec<Capsule> => CapsuleArray,
    Arc<SparseCapsuleArray> => SparseCapsuleArray,
    SerialObject => Serializable,
    Size => Size,
    SizeF => SizeF,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value.into())
    }
}

impl From<CapsuleMap> for Value {
    fn from(map: CapsuleMap) -> Self {
        Value::Map(Arc::new(map))
    }
}

impl From<SparseCapsuleArray> for Value {
    fn from(sparse: SparseCapsuleArray) -> Self {
        Value::SparseCapsuleArray(Arc::new(sparse))
    }
}
