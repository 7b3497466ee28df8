/// The exact kind of a stored value, one per [`Value`](crate::Value) variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    BoolArray,
    ByteArray,
    ShortArray,
    IntArray,
    LongArray,
    FloatArray,
    DoubleArray,
    CharArray,
    Text,
    TextArray,
    TextList,
    IntegerList,
    Handle,
    Map,
    Capsule,
    CapsuleArray,
    CapsuleList,
    SparseCapsuleArray,
    Serializable,
    Size,
    SizeF,
}

/// The coarse structural category of a [`Kind`].
///
/// Typed getters only look at the family. Lists in particular forget their
/// element type once stored, so every list getter accepts every list kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Scalar,
    Text,
    Array,
    List,
    Map,
    Capsule,
    Handle,
    SparseArray,
    Serializable,
    Size,
}

/// How the deep-copy engine treats a value of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// The payload is copied by value.
    ValueCopy,
    /// A new array or list is allocated; its elements are shared.
    ShallowContainer,
    /// The copy refers to the very same object as the source.
    Identity,
    /// The nested map is deep-copied in turn.
    Recursive,
}

impl Kind {
    pub fn family(self) -> Family {
        match self {
            Kind::Bool
            | Kind::Byte
            | Kind::Short
            | Kind::Int
            | Kind::Long
            | Kind::Float
            | Kind::Double
            | Kind::Char => Family::Scalar,
            Kind::BoolArray
            | Kind::ByteArray
            | Kind::ShortArray
            | Kind::IntArray
            | Kind::LongArray
            | Kind::FloatArray
            | Kind::DoubleArray
            | Kind::CharArray
            | Kind::TextArray
            | Kind::CapsuleArray => Family::Array,
            Kind::Text => Family::Text,
            Kind::TextList | Kind::IntegerList | Kind::CapsuleList => Family::List,
            Kind::Handle => Family::Handle,
            Kind::Map => Family::Map,
            Kind::Capsule => Family::Capsule,
            Kind::SparseCapsuleArray => Family::SparseArray,
            Kind::Serializable => Family::Serializable,
            Kind::Size | Kind::SizeF => Family::Size,
        }
    }

    /// The copy policy applied to values of this kind.
    ///
    /// `Capsule` reports `Identity`: a capsule that is a nested map is stored
    /// under [`Kind::Map`], so anything left under `Capsule` has no generic
    /// clone.
    pub fn copy_policy(self) -> CopyPolicy {
        match self {
            Kind::Bool
            | Kind::Byte
            | Kind::Short
            | Kind::Int
            | Kind::Long
            | Kind::Float
            | Kind::Double
            | Kind::Char
            | Kind::Size
            | Kind::SizeF => CopyPolicy::ValueCopy,
            Kind::BoolArray
            | Kind::ByteArray
            | Kind::ShortArray
            | Kind::IntArray
            | Kind::LongArray
            | Kind::FloatArray
            | Kind::DoubleArray
            | Kind::CharArray
            | Kind::TextArray
            | Kind::TextList
            | Kind::IntegerList
            | Kind::CapsuleArray
            | Kind::CapsuleList => CopyPolicy::ShallowContainer,
            Kind::Text
            | Kind::Handle
            | Kind::Capsule
            | Kind::SparseCapsuleArray
            | Kind::Serializable => CopyPolicy::Identity,
            Kind::Map => CopyPolicy::Recursive,
        }
    }

    /// Whether values of this kind can be read back as a generic
    /// serializable value.
    pub fn is_serializable(self) -> bool {
        matches!(
            self.family(),
            Family::Scalar | Family::Text | Family::Array | Family::List | Family::Serializable
        )
    }
}
