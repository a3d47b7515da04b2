//! The constraint-set algebra.
//!
//! Tallying produces a *constraint-set set*: a disjunction (outer set) of
//! conjunctive bundles (inner sets) of atomic constraints on flexible type
//! variables. A bundle keeps one `lower ≤ α ≤ upper` pair per variable;
//! merging bundles unions lower bounds and intersects upper bounds, so the
//! printed form stays small and canonical.
//!
//! Lattice structure:
//! - `join` is set union with dominance pruning (a bundle that is a strict
//!   superset of another is redundant: anything satisfying the superset
//!   satisfies the subset);
//! - `meet` is the pairwise bundle merge, with contradictory merges dropped;
//! - join's unit is the empty set ("no solution"), meet's unit is the
//!   singleton empty bundle ("trivially satisfied").
//!
//! The lazy operand discipline required of these combinators lives at the
//! call sites in the normalize engine: the mechanical operations here are
//! eager, and the engine short-circuits on the absorbing elements before
//! forcing a thunk.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::intern::TypeStore;
use crate::types::{TypeId, TypeVar};

// =============================================================================
// Bounds and bundles
// =============================================================================

/// The merged bounds on one variable: `lower ≤ α ≤ upper`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VarBounds {
    pub lower: TypeId,
    pub upper: TypeId,
}

impl VarBounds {
    fn is_trivial(&self) -> bool {
        self.lower == TypeId::EMPTY && self.upper == TypeId::ANY
    }
}

/// One conjunctive bundle of atomic constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ConstraintSet {
    bounds: BTreeMap<TypeVar, VarBounds>,
}

impl ConstraintSet {
    /// The trivially satisfied bundle.
    pub fn empty() -> Self {
        ConstraintSet::default()
    }

    /// The single constraint `α ≤ upper`. A trivial bound is dropped at
    /// construction, leaving the empty bundle.
    pub fn with_upper(var: TypeVar, upper: TypeId) -> Self {
        let mut cs = ConstraintSet::empty();
        if upper != TypeId::ANY {
            cs.bounds.insert(
                var,
                VarBounds {
                    lower: TypeId::EMPTY,
                    upper,
                },
            );
        }
        cs
    }

    /// The single constraint `lower ≤ α`.
    pub fn with_lower(var: TypeVar, lower: TypeId) -> Self {
        let mut cs = ConstraintSet::empty();
        if lower != TypeId::EMPTY {
            cs.bounds.insert(
                var,
                VarBounds {
                    lower,
                    upper: TypeId::ANY,
                },
            );
        }
        cs
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn get(&self, var: TypeVar) -> Option<&VarBounds> {
        self.bounds.get(&var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVar, &VarBounds)> {
        self.bounds.iter().map(|(v, b)| (*v, b))
    }

    /// Union of two bundles: lower bounds union, upper bounds intersect.
    pub(crate) fn merge(store: &TypeStore, a: &Self, b: &Self) -> Self {
        let mut bounds = a.bounds.clone();
        for (&var, vb) in &b.bounds {
            let merged = match bounds.get(&var) {
                Some(prev) => VarBounds {
                    lower: store.union(prev.lower, vb.lower),
                    upper: store.intersect(prev.upper, vb.upper),
                },
                None => *vb,
            };
            if merged.is_trivial() {
                bounds.remove(&var);
            } else {
                bounds.insert(var, merged);
            }
        }
        ConstraintSet { bounds }
    }

    /// The syntactic contradiction: `any ≤ α` together with `α ≤ empty`.
    pub fn has_syntactic_contradiction(&self) -> bool {
        self.bounds
            .values()
            .any(|b| b.lower == TypeId::ANY && b.upper == TypeId::EMPTY)
    }

    /// Is every constraint of `self` literally present in `other`?
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.bounds
            .iter()
            .all(|(v, b)| other.bounds.get(v) == Some(b))
    }
}

// =============================================================================
// Bundle sets
// =============================================================================

/// A disjunction of bundles, kept sorted and minimal (no bundle is a strict
/// superset of another).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConstraintSets {
    sets: Vec<ConstraintSet>,
}

impl ConstraintSets {
    /// Join's unit: no solution.
    pub fn none() -> Self {
        ConstraintSets { sets: Vec::new() }
    }

    /// Meet's unit: trivially satisfied.
    pub fn unit() -> Self {
        ConstraintSets {
            sets: vec![ConstraintSet::empty()],
        }
    }

    pub fn singleton(cs: ConstraintSet) -> Self {
        ConstraintSets { sets: vec![cs] }
    }

    pub fn is_none(&self) -> bool {
        self.sets.is_empty()
    }

    /// Does the set contain the empty bundle? After pruning that means the
    /// set *is* the unit, which absorbs joins and is meet's identity.
    pub fn is_trivially_satisfied(&self) -> bool {
        self.sets.iter().any(ConstraintSet::is_empty)
    }

    pub fn sets(&self) -> &[ConstraintSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Set union with dominance pruning.
    pub fn join(self, other: Self) -> Self {
        let mut all = self.sets;
        all.extend(other.sets);
        Self::from_vec_pruned(all)
    }

    /// Pairwise merge without semantic validation; the normalize engine
    /// layers the ground-bounds satisfiability check on top of this.
    pub fn meet_syntactic(store: &TypeStore, a: &Self, b: &Self) -> Self {
        let mut out = Vec::new();
        for s1 in &a.sets {
            for s2 in &b.sets {
                let merged = ConstraintSet::merge(store, s1, s2);
                if !merged.has_syntactic_contradiction() {
                    out.push(merged);
                }
            }
        }
        Self::from_vec_pruned(out)
    }

    /// Sort, dedup and remove dominated (strict superset) bundles.
    pub(crate) fn from_vec_pruned(mut sets: Vec<ConstraintSet>) -> Self {
        sets.sort();
        sets.dedup();
        let mut kept: Vec<ConstraintSet> = Vec::with_capacity(sets.len());
        'outer: for cand in sets {
            for other in &kept {
                if other.is_subset_of(&cand) {
                    // `other` is weaker or equal: it dominates `cand`.
                    continue 'outer;
                }
            }
            kept.retain(|other| !cand.is_subset_of(other));
            kept.push(cand);
        }
        kept.sort();
        ConstraintSets { sets: kept }
    }
}
