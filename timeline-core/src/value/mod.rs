//! The dynamic value model: a tagged value carrying primitives, time
//! values, strings, booleans, ordered arrays, and string-keyed dictionaries
//! (spec.md §3/§4.2).

mod any_array;
mod any_dictionary;
mod any_value;
mod geometry;
mod object_ref;

pub use any_array::{AnyArray, AnyArrayCursor};
pub use any_dictionary::{AnyDictionary, AnyDictionaryCursor};
pub use any_value::AnyValue;
pub use geometry::{Box2d, V2d};
pub use object_ref::ObjectRefId;
