//! The atom constructor: finite and cofinite sets of symbols.
//!
//! Language atoms (`'ok'`, `'error'`, …) form a countably infinite universe,
//! so Boolean combinations of finite atom sets are exactly the finite and
//! cofinite sets. The lattice is closed under complement and needs no atom
//! layer of its own: an `AtomSet` sits directly at the terminals of the
//! variable BDD of the atom slot.

use std::collections::BTreeSet;

use tyset_common::Symbol;

use crate::bdd::Leaf;

/// A finite or cofinite set of symbols.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AtomSet {
    /// Exactly these symbols.
    Finite(BTreeSet<Symbol>),
    /// Every symbol except these.
    Cofinite(BTreeSet<Symbol>),
}

impl AtomSet {
    pub fn singleton(sym: Symbol) -> Self {
        AtomSet::Finite(BTreeSet::from([sym]))
    }

    pub fn from_syms(syms: impl IntoIterator<Item = Symbol>) -> Self {
        AtomSet::Finite(syms.into_iter().collect())
    }

    pub fn contains(&self, sym: Symbol) -> bool {
        match self {
            AtomSet::Finite(s) => s.contains(&sym),
            AtomSet::Cofinite(s) => !s.contains(&sym),
        }
    }
}

impl Leaf for AtomSet {
    fn bottom() -> Self {
        AtomSet::Finite(BTreeSet::new())
    }

    fn top() -> Self {
        AtomSet::Cofinite(BTreeSet::new())
    }

    fn is_bottom(&self) -> bool {
        matches!(self, AtomSet::Finite(s) if s.is_empty())
    }

    fn is_top(&self) -> bool {
        matches!(self, AtomSet::Cofinite(s) if s.is_empty())
    }

    fn union(&self, other: &Self) -> Self {
        match (self, other) {
            (AtomSet::Finite(a), AtomSet::Finite(b)) => {
                AtomSet::Finite(a.union(b).copied().collect())
            }
            (AtomSet::Finite(f), AtomSet::Cofinite(c))
            | (AtomSet::Cofinite(c), AtomSet::Finite(f)) => {
                AtomSet::Cofinite(c.difference(f).copied().collect())
            }
            (AtomSet::Cofinite(a), AtomSet::Cofinite(b)) => {
                AtomSet::Cofinite(a.intersection(b).copied().collect())
            }
        }
    }

    fn intersect(&self, other: &Self) -> Self {
        match (self, other) {
            (AtomSet::Finite(a), AtomSet::Finite(b)) => {
                AtomSet::Finite(a.intersection(b).copied().collect())
            }
            (AtomSet::Finite(f), AtomSet::Cofinite(c))
            | (AtomSet::Cofinite(c), AtomSet::Finite(f)) => {
                AtomSet::Finite(f.difference(c).copied().collect())
            }
            (AtomSet::Cofinite(a), AtomSet::Cofinite(b)) => {
                AtomSet::Cofinite(a.union(b).copied().collect())
            }
        }
    }

    fn negate(&self) -> Self {
        match self {
            AtomSet::Finite(s) => AtomSet::Cofinite(s.clone()),
            AtomSet::Cofinite(s) => AtomSet::Finite(s.clone()),
        }
    }
}
