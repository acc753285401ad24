//! The on-wire shape of a forward reference to an already-written object:
//! `{"OTIO_SCHEMA":"SerializableObjectRef.1","id":"<schema>-<n>"}`.

use serde::{Deserialize, Serialize};

/// An unresolved pointer into the document being read, or a placeholder for
/// "the n-th object of this schema" while being written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRefId {
    pub id: String,
}

impl ObjectRefId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
