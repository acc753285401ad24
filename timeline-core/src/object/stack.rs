//! A `Composition` that overlays its children at a shared start time (the
//! familiar "stack of tracks" shape of a full timeline).

use super::base::ItemBase;
use super::composable::Composable;
use super::retainer::Retainer;

#[derive(Clone, Debug)]
pub struct Stack {
    pub item: ItemBase,
    pub children: Vec<Retainer<Composable>>,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            item: ItemBase::new(name),
            children: Vec::new(),
        }
    }
}
