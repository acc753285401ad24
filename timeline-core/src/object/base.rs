//! The common fields shared by every schema-tagged entity, composed rather
//! than inherited (spec.md §9 "Polymorphic entities" design note): each
//! concrete kind embeds the layer(s) it needs instead of extending a class
//! hierarchy.

use super::composable::Composable;
use super::effect::Effect;
use super::marker::Marker;
use super::retainer::{Retainer, WeakRetainer};
use crate::value::AnyDictionary;
use crate::TimeRange;

/// Underlies every schema-tagged entity: a metadata dictionary for
/// unrecognized/extra keys gathered by `read_from` (spec.md §4.6).
#[derive(Clone, Debug, Default)]
pub struct SerializableObjectBase {
    pub metadata: AnyDictionary,
}

/// Adds a name and the (weak, non-owning) back-pointer to the parent
/// Composition, present on every `Composable` variant.
#[derive(Clone, Debug, Default)]
pub struct ComposableBase {
    pub serializable: SerializableObjectBase,
    pub name: String,
    pub parent: WeakRetainer<Composable>,
}

impl ComposableBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            serializable: SerializableObjectBase::default(),
            name: name.into(),
            parent: WeakRetainer::new(),
        }
    }

    pub fn parent(&self) -> Option<Retainer<Composable>> {
        self.parent.upgrade()
    }
}

/// Composable plus an optional `source_range` and owned effect/marker lists
/// (spec.md §3). `Track`, `Stack`, `Clip`, `Gap` all embed this.
#[derive(Clone, Debug, Default)]
pub struct ItemBase {
    pub composable: ComposableBase,
    pub source_range: Option<TimeRange>,
    pub effects: Vec<Retainer<Effect>>,
    pub markers: Vec<Retainer<Marker>>,
}

impl ItemBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            composable: ComposableBase::new(name),
            source_range: None,
            effects: Vec::new(),
            markers: Vec::new(),
        }
    }
}
