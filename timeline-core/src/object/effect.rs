//! A named processing step attached to an `Item` through its `effects` list.

use super::base::SerializableObjectBase;

#[derive(Clone, Debug)]
pub struct Effect {
    pub base: SerializableObjectBase,
    pub name: String,
    pub effect_name: String,
}

impl Effect {
    pub fn new(name: impl Into<String>, effect_name: impl Into<String>) -> Self {
        Self {
            base: SerializableObjectBase::default(),
            name: name.into(),
            effect_name: effect_name.into(),
        }
    }
}
