//! The leaf algebras: finite/cofinite symbol sets and interval sets.

use tyset_common::Symbol;

use crate::bdd::Leaf;
use crate::dnf::atoms::AtomSet;
use crate::dnf::interval::IntervalSet;

fn sym(n: u32) -> Symbol {
    Symbol(n)
}

// =============================================================================
// AtomSet
// =============================================================================

#[test]
fn atom_set_complement_swaps_representation() {
    let fin = AtomSet::from_syms([sym(1), sym(2)]);
    let cof = fin.negate();
    assert!(!cof.contains(sym(1)));
    assert!(cof.contains(sym(3)));
    assert_eq!(cof.negate(), fin);
}

#[test]
fn atom_set_union_and_intersection() {
    let a = AtomSet::from_syms([sym(1), sym(2)]);
    let b = AtomSet::from_syms([sym(2), sym(3)]);
    let union = a.union(&b);
    assert!(union.contains(sym(1)) && union.contains(sym(3)));
    let both = a.intersect(&b);
    assert!(both.contains(sym(2)));
    assert!(!both.contains(sym(1)));
}

#[test]
fn atom_set_finite_minus_cofinite() {
    let a = AtomSet::from_syms([sym(1), sym(2)]);
    let without_one = AtomSet::singleton(sym(1)).negate();
    let only_two = a.intersect(&without_one);
    assert_eq!(only_two, AtomSet::singleton(sym(2)));
}

#[test]
fn atom_set_excluded_middle() {
    let a = AtomSet::from_syms([sym(1), sym(5)]);
    assert!(a.union(&a.negate()).is_top());
    assert!(a.intersect(&a.negate()).is_bottom());
}

// =============================================================================
// IntervalSet
// =============================================================================

#[test]
fn interval_adjacent_runs_merge() {
    let a = IntervalSet::range(Some(1), Some(3));
    let b = IntervalSet::range(Some(4), Some(6));
    let merged = a.union(&b);
    assert_eq!(merged, IntervalSet::range(Some(1), Some(6)));
    assert_eq!(merged.runs().len(), 1);
}

#[test]
fn interval_disjoint_runs_stay_apart() {
    let a = IntervalSet::range(Some(1), Some(3));
    let b = IntervalSet::range(Some(10), Some(12));
    let both = a.union(&b);
    assert_eq!(both.runs().len(), 2);
    assert!(both.contains(2) && both.contains(11) && !both.contains(5));
}

#[test]
fn interval_intersection() {
    let a = IntervalSet::range(Some(1), Some(10));
    let b = IntervalSet::range(Some(5), Some(20));
    assert_eq!(a.intersect(&b), IntervalSet::range(Some(5), Some(10)));
    let c = IntervalSet::range(Some(30), None);
    assert!(a.intersect(&c).is_bottom());
}

#[test]
fn interval_complement() {
    let nonneg = IntervalSet::range(Some(0), None);
    let neg = nonneg.negate();
    assert_eq!(neg, IntervalSet::range(None, Some(-1)));
    assert_eq!(neg.negate(), nonneg);
}

#[test]
fn interval_excluded_middle() {
    let a = IntervalSet::range(Some(0), Some(5));
    assert!(a.union(&a.negate()).is_top());
    assert!(a.intersect(&a.negate()).is_bottom());
    let b = IntervalSet::singleton(7);
    assert!(b.union(&b.negate()).is_top());
}

#[test]
fn interval_empty_range() {
    assert!(IntervalSet::range(Some(5), Some(1)).is_bottom());
    assert!(IntervalSet::range(None, None).is_top());
}

#[test]
fn interval_singleton_membership() {
    let s = IntervalSet::singleton(42);
    assert!(s.contains(42));
    assert!(!s.contains(41));
    let punctured = s.negate();
    assert!(punctured.contains(41) && punctured.contains(43) && !punctured.contains(42));
    assert_eq!(punctured.runs().len(), 2);
}
