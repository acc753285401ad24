//! Tracks `SerializableObjectRef.1` markers while the Reader decodes a
//! document. The Writer only ever emits a reference for the *second and
//! later* occurrence of an object within a single write — the first
//! occurrence, with its full fields, is always written first in the same
//! depth-first order the Reader walks the parsed tree in. So a reference
//! a well-formed document produces always names an id that decoding has
//! already resolved by the time the reference itself is reached; the
//! Resolver's job is to catch the cases where that invariant doesn't hold
//! (a hand-authored or corrupted document, a duplicate id) and fail
//! cleanly with [`Error::UnresolvedObjectReference`] /
//! [`Error::DuplicateObjectReference`] rather than panicking (spec.md
//! §4.6, §8).

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::object::AnyObject;

#[derive(Default)]
pub struct Resolver {
    next_id_for_type: HashMap<String, u64>,
    resolved: HashMap<String, AnyObject>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirrors the Writer's per-type reference-id counter so that reading an
    /// object in the same depth-first order it was written reconstructs the
    /// same `"<Schema>-<n>"` id, without that id ever appearing in the
    /// document next to the full (first) occurrence (spec.md §4.5).
    pub fn allocate_id(&mut self, schema_name: &str) -> String {
        let counter = self.next_id_for_type.entry(schema_name.to_string()).or_insert(0);
        *counter += 1;
        format!("{schema_name}-{counter}")
    }

    pub fn get(&self, id: &str) -> Option<AnyObject> {
        self.resolved.get(id).cloned()
    }

    pub fn register(&mut self, id: String, object: AnyObject) -> Result<()> {
        if self.resolved.contains_key(&id) {
            return Err(Error::DuplicateObjectReference(id));
        }
        self.resolved.insert(id, object);
        Ok(())
    }

    /// No-op today: every reference is resolved synchronously as it's
    /// decoded (see module docs). Kept as the end-of-parse checkpoint
    /// spec.md §4.6 describes, so a future true-forward-reference source
    /// (e.g. a streaming reader) has a place to finalize deferred patches
    /// without changing this type's public shape.
    pub fn finalize(self) -> Result<()> {
        Ok(())
    }
}
