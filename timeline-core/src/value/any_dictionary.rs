//! An insertion-ordered `String -> AnyValue` map with iterator-invalidation
//! detection: every structural mutation bumps a stamp, and any cursor still
//! outstanding at the next mutation fails on its next `next()` step rather
//! than silently walking a torn map.

use super::any_value::AnyValue;
use crate::error::{Error, Result};
use indexmap::IndexMap;

#[derive(Clone, Debug, Default)]
pub struct AnyDictionary {
    entries: IndexMap<String, AnyValue>,
    stamp: u64,
}

/// Content equality, ignoring the mutation stamp and key order (order only
/// matters for deterministic output, not for value equality).
impl PartialEq for AnyDictionary {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl AnyDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&AnyValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: AnyValue) -> Option<AnyValue> {
        self.stamp += 1;
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<AnyValue> {
        let removed = self.entries.shift_remove(key);
        if removed.is_some() {
            self.stamp += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.stamp += 1;
        }
        self.entries.clear();
    }

    /// Starts a new cursor over this dictionary. A cursor holds no borrow
    /// of `self`, so `self` can be freely mutated while one is outstanding —
    /// [`Self::next`] then detects the mutation on the following step.
    pub fn cursor(&self) -> AnyDictionaryCursor {
        AnyDictionaryCursor {
            position: 0,
            stamp_at_creation: self.stamp,
        }
    }

    /// Advances `cursor` and returns the entry at its new position, `None`
    /// past the end, or `Err(IteratorInvalidated)` if `self` has
    /// structurally mutated since `cursor` was created. Re-borrows `self`
    /// fresh on every call (unlike a `std::iter::Iterator`, whose adapter
    /// struct would have to hold a borrow across calls), so mutating `self`
    /// between two calls to `next` is possible to express and is exactly
    /// what this method is meant to catch.
    pub fn next<'a>(
        &'a self,
        cursor: &mut AnyDictionaryCursor,
    ) -> Option<Result<(&'a str, &'a AnyValue)>> {
        if self.stamp != cursor.stamp_at_creation {
            return Some(Err(Error::IteratorInvalidated));
        }
        let (key, value) = self.entries.get_index(cursor.position)?;
        cursor.position += 1;
        Some(Ok((key.as_str(), value)))
    }
}

impl FromIterator<(String, AnyValue)> for AnyDictionary {
    fn from_iter<I: IntoIterator<Item = (String, AnyValue)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

/// An iteration position over an [`AnyDictionary`], independent of any
/// borrow of the dictionary itself.
#[derive(Clone, Debug)]
pub struct AnyDictionaryCursor {
    position: usize,
    stamp_at_creation: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut d = AnyDictionary::new();
        d.insert("a", AnyValue::Int(1));
        assert_eq!(d.get("a"), Some(&AnyValue::Int(1)));
    }

    #[test]
    fn preserves_insertion_order() {
        let mut d = AnyDictionary::new();
        d.insert("z", AnyValue::Int(1));
        d.insert("a", AnyValue::Int(2));
        let mut cursor = d.cursor();
        let mut keys = Vec::new();
        while let Some(entry) = d.next(&mut cursor) {
            keys.push(entry.unwrap().0);
        }
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn mutation_during_iteration_invalidates() {
        let mut d = AnyDictionary::new();
        d.insert("a", AnyValue::Int(1));
        d.insert("b", AnyValue::Int(2));
        let mut cursor = d.cursor();
        assert!(d.next(&mut cursor).unwrap().is_ok());
        d.insert("c", AnyValue::Int(3));
        assert!(matches!(
            d.next(&mut cursor),
            Some(Err(Error::IteratorInvalidated))
        ));
    }

    #[test]
    fn remove_bumps_stamp_only_when_present() {
        let mut d = AnyDictionary::new();
        d.insert("a", AnyValue::Int(1));
        let mut cursor = d.cursor();
        assert!(d.remove("missing").is_none());
        // no structural change happened, so the outstanding cursor is still valid
        assert!(d.next(&mut cursor).unwrap().is_ok());
    }
}
