//! The composition object graph: a polymorphic tree of timeline entities
//! with parent/child relationships, ordered sibling lists, and the
//! structural invariants from spec.md §3/§4.3.

mod any_object;
mod base;
mod clip;
mod composable;
mod composition;
mod effect;
mod gap;
mod marker;
mod media_reference;
mod retainer;
mod stack;
mod track;
mod transition;
mod unknown_schema;

pub use any_object::AnyObject;
pub use base::{ComposableBase, ItemBase, SerializableObjectBase};
pub use clip::Clip;
pub use composable::Composable;
pub use composition::{
    append_child, child_at, detach, index_of, insert_after, insert_before, insert_child, len,
    remove_child_at,
};
pub use effect::Effect;
pub use gap::Gap;
pub use marker::Marker;
pub use media_reference::{ExternalReference, GeneratorReference, ImageSequenceReference, MediaReference, MissingReference};
pub use retainer::{ObjectIdentity, Retainer, WeakRetainer};
pub use stack::Stack;
pub use track::{Track, TrackKind};
pub use transition::Transition;
pub use unknown_schema::UnknownSchema;
