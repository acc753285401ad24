//! An annotation at a point or range on an `Item`.

use super::base::SerializableObjectBase;
use crate::TimeRange;

#[derive(Clone, Debug)]
pub struct Marker {
    pub base: SerializableObjectBase,
    pub name: String,
    pub marked_range: TimeRange,
    pub color: String,
}

impl Marker {
    pub fn new(name: impl Into<String>, marked_range: TimeRange, color: impl Into<String>) -> Self {
        Self {
            base: SerializableObjectBase::default(),
            name: name.into(),
            marked_range,
            color: color.into(),
        }
    }
}
