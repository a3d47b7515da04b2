//! Canonicalization laws of the generic BDD.

use crate::bdd::Bdd;

type B = Bdd<u32, bool>;

#[test]
fn atom_or_its_negation_is_top() {
    let b = B::atom(1).union(&B::negated_atom(1));
    assert!(b.is_top());
    assert_eq!(b, B::top());
}

#[test]
fn atom_and_its_negation_is_bottom() {
    let b = B::atom(1).intersect(&B::negated_atom(1));
    assert!(b.is_bottom());
    assert_eq!(b, B::bottom());
}

#[test]
fn diff_with_self_is_bottom() {
    let x = B::atom(1).union(&B::atom(2));
    assert!(x.diff(&x).is_bottom());
}

#[test]
fn union_is_structurally_commutative() {
    let a = B::atom(1);
    let b = B::atom(2);
    assert_eq!(a.union(&b), b.union(&a));
    let c = B::negated_atom(3).intersect(&a);
    assert_eq!(b.union(&c), c.union(&b));
}

#[test]
fn intersect_is_structurally_commutative() {
    let a = B::atom(1);
    let b = B::negated_atom(2);
    assert_eq!(a.intersect(&b), b.intersect(&a));
}

#[test]
fn double_negation_is_identity() {
    let x = B::atom(1).union(&B::atom(2).intersect(&B::negated_atom(3)));
    assert_eq!(x.negate().negate(), x);
}

#[test]
fn de_morgan_is_structural() {
    let a = B::atom(1);
    let b = B::atom(2);
    assert_eq!(
        a.union(&b).negate(),
        a.negate().intersect(&b.negate())
    );
    assert_eq!(
        a.intersect(&b).negate(),
        a.negate().union(&b.negate())
    );
}

#[test]
fn absorbing_and_identity_leaves() {
    let x = B::atom(7);
    assert_eq!(x.union(&B::bottom()), x);
    assert_eq!(x.union(&B::top()), B::top());
    assert_eq!(x.intersect(&B::top()), x);
    assert_eq!(x.intersect(&B::bottom()), B::bottom());
}

#[test]
fn coclauses_flatten_in_walk_order() {
    let x = B::atom(1).union(&B::atom(2));
    let cs = x.coclauses();
    assert_eq!(cs.len(), 2);
    assert_eq!(cs[0].pos.as_slice(), &[1]);
    assert!(cs[0].neg.is_empty());
    assert_eq!(cs[1].pos.as_slice(), &[2]);
    assert_eq!(cs[1].neg.as_slice(), &[1]);
    assert!(cs.iter().all(|c| c.leaf));
}

#[test]
fn bottom_branches_are_skipped() {
    let x = B::atom(1);
    let cs = x.coclauses();
    assert_eq!(cs.len(), 1);
    assert_eq!(cs[0].pos.as_slice(), &[1]);
}

#[test]
fn atoms_stay_ordered_on_any_path() {
    // Build in "wrong" order; the apply keeps paths sorted.
    let x = B::atom(3).intersect(&B::atom(1)).intersect(&B::atom(2));
    for c in x.coclauses() {
        let mut sorted = c.pos.clone();
        sorted.sort();
        assert_eq!(c.pos, sorted);
    }
}

#[test]
fn nested_bdd_leaves_form_a_lattice() {
    type Nested = Bdd<u32, Bdd<u8, bool>>;
    let inner1 = Bdd::<u8, bool>::atom(1);
    let inner2 = Bdd::<u8, bool>::atom(2);
    let a = Nested::leaf(inner1.clone());
    let b = Nested::leaf(inner2.clone());
    assert_eq!(a.union(&b), Nested::leaf(inner1.union(&inner2)));
    // The nested leaf participates in canonicalization: a leaf-level
    // contradiction collapses the node.
    let c = Nested::leaf(inner1.clone()).intersect(&Nested::leaf(inner1.negate()));
    assert!(c.is_bottom());
}

#[test]
fn map_atoms_recanonicalizes() {
    // Reversing atom identity reorders the tree but keeps the semantics.
    let x = B::atom(1).union(&B::atom(2).intersect(&B::negated_atom(3)));
    let mapped = x.map_atoms(&mut |a| 10 - a);
    let remapped = mapped.map_atoms(&mut |a| 10 - a);
    assert_eq!(remapped, x);
}
