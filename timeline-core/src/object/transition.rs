//! A zero-duration Composable modeling a dissolve or cut: in/out offsets
//! into the neighboring items plus a free-form transition type string.

use super::base::ComposableBase;
use crate::RationalTime;

#[derive(Clone, Debug)]
pub struct Transition {
    pub base: ComposableBase,
    pub in_offset: RationalTime,
    pub out_offset: RationalTime,
    pub transition_type: String,
}

impl Transition {
    pub fn new(
        name: impl Into<String>,
        transition_type: impl Into<String>,
        in_offset: RationalTime,
        out_offset: RationalTime,
    ) -> Self {
        Self {
            base: ComposableBase::new(name),
            in_offset,
            out_offset,
            transition_type: transition_type.into(),
        }
    }
}
