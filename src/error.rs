use crate::kind::{Family, Kind};
use thiserror::Error;

/// Errors that can occur when using a capsule map
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Failed to acquire lock on a shared map
    #[error("failed to acquire lock")]
    LockError,

    /// The requested key was not found
    #[error("key not found in map: {0}")]
    KeyNotFound(String),

    /// The stored value belongs to a different family than the one requested
    #[error("key {key:?} expected {expected:?} but value was {found:?}")]
    TypeMismatch {
        key: String,
        expected: Family,
        found: Kind,
    },

    /// A list element could not be narrowed to the requested element type
    #[error("list element {index} expected {expected} but was {found}")]
    ElementMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}
