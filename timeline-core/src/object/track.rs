//! A `Composition` that lays its children end-to-end along a single media
//! kind (video or audio).

use super::base::ItemBase;
use super::composable::Composable;
use super::retainer::Retainer;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

#[derive(Clone, Debug)]
pub struct Track {
    pub item: ItemBase,
    pub children: Vec<Retainer<Composable>>,
    pub kind: TrackKind,
}

impl Track {
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            item: ItemBase::new(name),
            children: Vec::new(),
            kind,
        }
    }
}
