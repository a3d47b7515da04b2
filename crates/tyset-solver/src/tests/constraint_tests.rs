//! Mechanical properties of the constraint-set algebra.

use crate::constraints::{ConstraintSet, ConstraintSets};
use crate::{TypeId, TypeStore};

#[test]
fn trivial_bounds_are_dropped_at_construction() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    assert!(ConstraintSet::with_upper(a, TypeId::ANY).is_empty());
    assert!(ConstraintSet::with_lower(a, TypeId::EMPTY).is_empty());
    assert!(!ConstraintSet::with_upper(a, store.int_any()).is_empty());
}

#[test]
fn merge_combines_bounds_per_variable() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    let upper = ConstraintSet::with_upper(a, store.int_any());
    let lower = ConstraintSet::with_lower(a, store.int_value(5));
    let merged = ConstraintSet::merge(&store, &upper, &lower);
    let bounds = merged.get(a).expect("bounds for a");
    assert_eq!(bounds.lower, store.int_value(5));
    assert_eq!(bounds.upper, store.int_any());
}

#[test]
fn merge_unions_lowers_and_intersects_uppers() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    let u1 = ConstraintSet::with_upper(a, store.int_range(Some(0), Some(10)));
    let u2 = ConstraintSet::with_upper(a, store.int_range(Some(5), Some(20)));
    let merged = ConstraintSet::merge(&store, &u1, &u2);
    assert_eq!(
        merged.get(a).expect("bounds").upper,
        store.int_range(Some(5), Some(10))
    );
}

#[test]
fn syntactic_contradiction_detected() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    let impossible = ConstraintSet::merge(
        &store,
        &ConstraintSet::with_lower(a, TypeId::ANY),
        &ConstraintSet::with_upper(a, TypeId::EMPTY),
    );
    assert!(impossible.has_syntactic_contradiction());
}

#[test]
fn join_unit_dominates() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    let cs = ConstraintSets::singleton(ConstraintSet::with_upper(a, store.int_any()));
    let joined = cs.join(ConstraintSets::unit());
    assert!(joined.is_trivially_satisfied());
    assert_eq!(joined.len(), 1);
}

#[test]
fn join_none_is_identity() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    let cs = ConstraintSets::singleton(ConstraintSet::with_upper(a, store.int_any()));
    assert_eq!(cs.clone().join(ConstraintSets::none()), cs);
}

#[test]
fn join_dedups_and_prunes_supersets() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    let b = store.type_var("b");
    let small = ConstraintSet::with_upper(a, store.int_any());
    let big = ConstraintSet::merge(
        &store,
        &small,
        &ConstraintSet::with_upper(b, store.atom_any()),
    );
    let joined = ConstraintSets::singleton(small.clone())
        .join(ConstraintSets::singleton(big))
        .join(ConstraintSets::singleton(small.clone()));
    assert_eq!(joined.len(), 1);
    assert_eq!(joined.sets()[0], small);
}

#[test]
fn meet_syntactic_is_pairwise() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    let b = store.type_var("b");
    let left = ConstraintSets::singleton(ConstraintSet::with_upper(a, store.int_any()));
    let right = ConstraintSets::singleton(ConstraintSet::with_lower(b, store.atom_any()));
    let met = ConstraintSets::meet_syntactic(&store, &left, &right);
    assert_eq!(met.len(), 1);
    let bundle = &met.sets()[0];
    assert_eq!(bundle.len(), 2);
    assert!(bundle.get(a).is_some() && bundle.get(b).is_some());
}

#[test]
fn meet_with_none_is_none() {
    let store = TypeStore::new();
    let a = store.type_var("a");
    let left = ConstraintSets::singleton(ConstraintSet::with_upper(a, store.int_any()));
    assert!(ConstraintSets::meet_syntactic(&store, &left, &ConstraintSets::none()).is_none());
}
