//! # capsule-map
//!
//! A heterogeneous, typed key/value container with a per-kind deep copy.
//!
//! `capsule-map` stores values drawn from a closed set of kinds (scalars,
//! scalar arrays, text, lists, opaque handles, nested maps, polymorphic
//! capsules, sparse capsule arrays, generic serializables and sizes) under
//! string keys. Each kind has a fixed copy policy, applied by
//! [`deep_copy`]:
//!
//! - **Value copy**: scalars, [`Size`] and [`SizeF`]
//! - **Shallow container**: arrays and lists get a new container, elements are shared
//! - **Identity**: text, [`Handle`]s, non-map [`Capsule`]s, sparse arrays and
//!   serializables stay the very same object
//! - **Recursive**: nested [`CapsuleMap`]s are deep-copied in turn
//!
//! ## Key Features
//!
//! - **Closed kinds**: every entry is a [`Value`] variant, so copying is an exhaustive match
//! - **Lenient getters**: a getter for the wrong family returns `None`, never panics
//! - **Erased lists**: list getters only check that a list is stored; elements are
//!   narrowed on access through [`TypedList`]
//! - **Opt-in sharing**: [`SharedCapsuleMap`] wraps a map in `Arc<Mutex<_>>`
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use capsule_map::{CapsuleMap, Size};
//!
//! let mut map = CapsuleMap::new();
//!
//! // Store values of different kinds
//! map.set_int("count", 42);
//! map.set_char_sequence("title", String::from("Hello, world!"));
//! map.set_size("icon", Size::new(48, 48));
//!
//! // Read them back by kind
//! assert_eq!(map.get_int("count"), Some(42));
//! assert_eq!(map.get_text("title").map(|t| t.as_str()), Some("Hello, world!"));
//!
//! // A getter of another kind finds nothing
//! assert!(map.get_long("count").is_none());
//! assert!(map.get_size_f("icon").is_none());
//! ```
//!
//! ### Deep Copy
//!
//! ```rust
//! use capsule_map::{CapsuleMap, Handle, Value};
//!
//! struct Connection;
//!
//! let mut inner = CapsuleMap::new();
//! inner.set_long("id", 7);
//!
//! let mut map = CapsuleMap::new();
//! map.set_map("inner", inner);
//! map.set_handle("connection", Handle::new(Connection));
//! map.set_int_array("ints", [i32::MIN, i32::MAX]);
//!
//! let mut copy = map.deep_copy();
//!
//! // Nested maps are new instances with the same content
//! let original = map.get_map("inner").unwrap();
//! let copied = copy.get_map("inner").unwrap();
//! assert!(!std::ptr::eq(original, copied));
//! assert_eq!(original, copied);
//!
//! // Handles are never duplicated
//! assert!(map.get_handle("connection").unwrap().ptr_eq(copy.get_handle("connection").unwrap()));
//!
//! // Arrays are independent
//! if let Some(Value::IntArray(ints)) = copy.get_mut("ints") {
//!     ints[0] = 0;
//! }
//! assert_eq!(map.get_int_array("ints"), Some(&[i32::MIN, i32::MAX][..]));
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use capsule_map::{CapsuleMap, MapError};
//!
//! let mut map = CapsuleMap::new();
//! map.set_text_list("names", ["alice", "bob"]);
//!
//! // Strict reads tell a missing key apart from a kind mismatch
//! match map.try_get_as::<&[i32]>("names") {
//!     Ok(ints) => println!("ints: {:?}", ints),
//!     Err(MapError::KeyNotFound(key)) => println!("{} not found", key),
//!     Err(MapError::TypeMismatch { expected, found, .. }) => {
//!         println!("expected {:?}, found {:?}", expected, found)
//!     }
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! // Lists hand back any element type; elements fail to narrow instead
//! let numbers = map.get_integer_list("names").unwrap();
//! assert!(matches!(numbers.to_vec(), Err(MapError::ElementMismatch { .. })));
//! ```

mod access;
mod capsule;
mod copy;
mod error;
mod handle;
mod kind;
mod map;
mod shared;
mod text;
mod value;

pub use access::{FromCapsule, ListElement, ListSlice, TypedList};
pub use capsule::{Capsule, SerialObject, Serializable, SparseCapsuleArray, Transportable};
pub use copy::{deep_copy, policy_of};
pub use error::MapError;
pub use handle::Handle;
pub use kind::{CopyPolicy, Family, Kind};
pub use map::CapsuleMap;
pub use shared::SharedCapsuleMap;
pub use text::Text;
pub use value::{Size, SizeF, Value};
