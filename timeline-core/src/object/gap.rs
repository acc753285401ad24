//! Filler: an `Item` with no media, occupying time in a Track/Stack.

use super::base::ItemBase;

#[derive(Clone, Debug)]
pub struct Gap {
    pub item: ItemBase,
}

impl Gap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            item: ItemBase::new(name),
        }
    }
}
