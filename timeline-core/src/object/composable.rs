//! `Composable`: the closed sum type for every entity that can sit in a
//! Track/Stack's children list (spec.md's GLOSSARY). Dispatch is by `match`
//! on the tag rather than virtual calls (spec.md §9 "Polymorphic entities").

use super::base::ComposableBase;
use super::clip::Clip;
use super::gap::Gap;
use super::retainer::{ObjectIdentity, Retainer, WeakRetainer};
use super::track::Track;
use super::transition::Transition;
use super::stack::Stack;
use crate::value::AnyDictionary;

#[derive(Clone, Debug)]
pub enum Composable {
    Track(Track),
    Stack(Stack),
    Clip(Clip),
    Gap(Gap),
    Transition(Transition),
}

impl Composable {
    pub fn schema_name(&self) -> &'static str {
        match self {
            Composable::Track(_) => "Track",
            Composable::Stack(_) => "Stack",
            Composable::Clip(_) => "Clip",
            Composable::Gap(_) => "Gap",
            Composable::Transition(_) => "Transition",
        }
    }

    pub fn schema_version(&self) -> i64 {
        1
    }

    fn base(&self) -> &ComposableBase {
        match self {
            Composable::Track(t) => &t.item.composable,
            Composable::Stack(s) => &s.item.composable,
            Composable::Clip(c) => &c.item.composable,
            Composable::Gap(g) => &g.item.composable,
            Composable::Transition(t) => &t.base,
        }
    }

    fn base_mut(&mut self) -> &mut ComposableBase {
        match self {
            Composable::Track(t) => &mut t.item.composable,
            Composable::Stack(s) => &mut s.item.composable,
            Composable::Clip(c) => &mut c.item.composable,
            Composable::Gap(g) => &mut g.item.composable,
            Composable::Transition(t) => &mut t.base,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.base_mut().name = name.into();
    }

    pub fn metadata(&self) -> &AnyDictionary {
        &self.base().serializable.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut AnyDictionary {
        &mut self.base_mut().serializable.metadata
    }

    pub fn parent(&self) -> Option<Retainer<Composable>> {
        self.base().parent.upgrade()
    }

    pub(super) fn set_parent(&mut self, parent: WeakRetainer<Composable>) {
        self.base_mut().parent = parent;
    }

    pub fn is_composition(&self) -> bool {
        matches!(self, Composable::Track(_) | Composable::Stack(_))
    }

    pub fn children(&self) -> Option<&[Retainer<Composable>]> {
        match self {
            Composable::Track(t) => Some(&t.children),
            Composable::Stack(s) => Some(&s.children),
            _ => None,
        }
    }

    pub(super) fn children_mut(&mut self) -> Option<&mut Vec<Retainer<Composable>>> {
        match self {
            Composable::Track(t) => Some(&mut t.children),
            Composable::Stack(s) => Some(&mut s.children),
            _ => None,
        }
    }

    /// Walks `self`'s parent chain looking for `ancestor` by identity.
    pub fn is_descended_from(&self, ancestor: ObjectIdentity) -> bool {
        let mut current = self.parent();
        while let Some(p) = current {
            if p.identity() == ancestor {
                return true;
            }
            current = p.borrow().parent();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::gap::Gap;

    #[test]
    fn fresh_composable_has_no_parent() {
        let gap = Composable::Gap(Gap::new("g"));
        assert!(gap.parent().is_none());
    }

    #[test]
    fn name_accessors_round_trip() {
        let mut gap = Composable::Gap(Gap::new("g"));
        gap.set_name("renamed");
        assert_eq!(gap.name(), "renamed");
    }
}
