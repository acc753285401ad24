//! Sibling-list maintenance for `Track`/`Stack`: insertion, removal, and
//! detachment, enforcing the single-parent and no-cycle invariants from
//! spec.md §3/§4.3. Modeled as free functions over `Retainer<Composable>`
//! rather than a shared base class, per spec.md §9's "avoid deep
//! inheritance, dispatch on the tag" note — `Track` and `Stack` are the only
//! two variants with a `children` list, so there is no trait to abstract
//! over; these functions just match on the tag via `Composable::children_mut`.

use super::composable::Composable;
use super::retainer::Retainer;
use crate::error::{EntityRef, Error, Result};

fn not_a_composition(composable: &Composable) -> Error {
    Error::TypeMismatch {
        expected: "Track or Stack".to_string(),
        found: composable.schema_name().to_string(),
    }
}

pub fn len(composition: &Retainer<Composable>) -> Result<usize> {
    let c = composition.borrow();
    c.children().map(|v| v.len()).ok_or_else(|| not_a_composition(&c))
}

pub fn child_at(composition: &Retainer<Composable>, index: usize) -> Result<Retainer<Composable>> {
    let c = composition.borrow();
    let children = c.children().ok_or_else(|| not_a_composition(&c))?;
    children
        .get(index)
        .cloned()
        .ok_or(Error::IllegalIndex { index, len: children.len() })
}

pub fn index_of(composition: &Retainer<Composable>, child: &Retainer<Composable>) -> Option<usize> {
    let c = composition.borrow();
    c.children()?.iter().position(|c| c.ptr_eq(child))
}

/// Inserts `child` at `index` (clamped to the current length), detaching it
/// from any prior parent first. Fails with `ObjectCycle` if `composition` is
/// `child` itself or is already descended from it — inserting would create a
/// cycle (spec.md §3 invariant, §8 "cycle detection" scenario).
pub fn insert_child(composition: &Retainer<Composable>, index: usize, child: Retainer<Composable>) -> Result<()> {
    {
        let comp_ref = composition.borrow();
        if !comp_ref.is_composition() {
            return Err(not_a_composition(&comp_ref));
        }
    }
    if composition.identity() == child.identity() || composition.borrow().is_descended_from(child.identity()) {
        return Err(Error::ObjectCycle(Some(EntityRef {
            schema_name: child.borrow().schema_name().to_string(),
            name: Some(child.borrow().name().to_string()),
        })));
    }

    detach(&child)?;

    let mut comp_mut = composition.borrow_mut();
    let children = comp_mut.children_mut().expect("checked above");
    let clamped = index.min(children.len());
    children.insert(clamped, child.clone());
    drop(comp_mut);

    child.borrow_mut().set_parent(composition.downgrade());
    Ok(())
}

pub fn append_child(composition: &Retainer<Composable>, child: Retainer<Composable>) -> Result<()> {
    let index = len(composition)?;
    insert_child(composition, index, child)
}

pub fn insert_before(
    composition: &Retainer<Composable>,
    anchor: &Retainer<Composable>,
    child: Retainer<Composable>,
) -> Result<()> {
    let index = index_of(composition, anchor).ok_or(Error::NotAChild)?;
    insert_child(composition, index, child)
}

pub fn insert_after(
    composition: &Retainer<Composable>,
    anchor: &Retainer<Composable>,
    child: Retainer<Composable>,
) -> Result<()> {
    let index = index_of(composition, anchor).ok_or(Error::NotAChild)?;
    insert_child(composition, index + 1, child)
}

pub fn remove_child_at(composition: &Retainer<Composable>, index: usize) -> Result<Retainer<Composable>> {
    let mut comp_mut = composition.borrow_mut();
    let children = comp_mut.children_mut().ok_or_else(|| not_a_composition(&comp_mut))?;
    if index >= children.len() {
        return Err(Error::IllegalIndex { index, len: children.len() });
    }
    let removed = children.remove(index);
    drop(comp_mut);
    removed.borrow_mut().set_parent(Default::default());
    Ok(removed)
}

/// Removes `child` from whatever composition currently parents it, if any.
/// A no-op (not an error) if `child` has no parent.
pub fn detach(child: &Retainer<Composable>) -> Result<()> {
    let Some(parent) = child.borrow().parent() else {
        return Ok(());
    };
    let index = index_of(&parent, child).ok_or(Error::NotAChildOf)?;
    remove_child_at(&parent, index)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::gap::Gap;
    use crate::object::stack::Stack;

    fn new_stack(name: &str) -> Retainer<Composable> {
        Retainer::new(Composable::Stack(Stack::new(name)))
    }

    fn new_gap(name: &str) -> Retainer<Composable> {
        Retainer::new(Composable::Gap(Gap::new(name)))
    }

    #[test]
    fn append_sets_parent_and_order() {
        let stack = new_stack("s");
        let a = new_gap("a");
        let b = new_gap("b");
        append_child(&stack, a.clone()).unwrap();
        append_child(&stack, b.clone()).unwrap();

        assert_eq!(len(&stack).unwrap(), 2);
        assert!(a.borrow().parent().unwrap().ptr_eq(&stack));
        assert!(b.borrow().parent().unwrap().ptr_eq(&stack));
        assert_eq!(child_at(&stack, 0).unwrap().borrow().name(), "a");
        assert_eq!(child_at(&stack, 1).unwrap().borrow().name(), "b");
    }

    #[test]
    fn inserting_already_parented_child_detaches_first() {
        let s1 = new_stack("s1");
        let s2 = new_stack("s2");
        let a = new_gap("a");
        append_child(&s1, a.clone()).unwrap();
        append_child(&s2, a.clone()).unwrap();

        assert_eq!(len(&s1).unwrap(), 0);
        assert_eq!(len(&s2).unwrap(), 1);
        assert!(a.borrow().parent().unwrap().ptr_eq(&s2));
    }

    #[test]
    fn detach_clears_parent_and_removes_from_list() {
        let stack = new_stack("s");
        let a = new_gap("a");
        append_child(&stack, a.clone()).unwrap();
        detach(&a).unwrap();
        assert!(a.borrow().parent().is_none());
        assert_eq!(len(&stack).unwrap(), 0);
    }

    #[test]
    fn inserting_ancestor_into_descendant_fails_with_cycle() {
        let outer = new_stack("outer");
        let inner = new_stack("inner");
        append_child(&outer, inner.clone()).unwrap();

        let err = insert_child(&inner, 0, outer.clone()).unwrap_err();
        assert!(matches!(err, Error::ObjectCycle(_)));
    }

    #[test]
    fn inserting_self_fails_with_cycle() {
        let s = new_stack("s");
        let err = insert_child(&s, 0, s.clone()).unwrap_err();
        assert!(matches!(err, Error::ObjectCycle(_)));
    }

    #[test]
    fn insert_before_and_after_place_relative_to_anchor() {
        let stack = new_stack("s");
        let a = new_gap("a");
        let b = new_gap("b");
        let c = new_gap("c");
        append_child(&stack, a.clone()).unwrap();
        append_child(&stack, c.clone()).unwrap();
        insert_before(&stack, &c, b.clone()).unwrap();

        let names: Vec<String> = (0..3)
            .map(|i| child_at(&stack, i).unwrap().borrow().name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn leaf_composable_rejects_child_insertion() {
        let gap_as_parent = new_gap("not-a-composition");
        let child = new_gap("child");
        let err = insert_child(&gap_as_parent, 0, child).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}
