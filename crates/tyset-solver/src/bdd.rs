//! Generic binary decision diagrams over ordered atoms.
//!
//! Every constructor DNF in the engine is a [`Bdd`] specialized to that
//! constructor's atom type; the variable layer of a type-record slot is a
//! `Bdd` over [`TypeVar`](crate::TypeVar) atoms whose *leaves* are the
//! constructor DNF. That nesting is what the [`Leaf`] trait buys: the leaf
//! algebra is usually the two-element Boolean lattice, but a `Bdd` is itself
//! a `Leaf`, as are the finite/cofinite symbol sets and interval sets.
//!
//! Canonical form:
//! - atoms on any root-to-leaf path appear in strictly increasing order;
//! - a node whose two children are equal collapses to that child.
//!
//! With those two rules, Boolean-equivalent combinations of the same atoms
//! build structurally equal trees, so `t ∨ ¬t` really is the top leaf and
//! `t ∧ ¬t` the bottom leaf, and structural equality is cheap and meaningful
//! for interning.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use smallvec::SmallVec;

// =============================================================================
// Traits
// =============================================================================

/// Requirements on BDD atoms: cheap to clone, totally ordered, hashable.
pub trait BddAtom: Clone + Eq + Ord + Hash + fmt::Debug {}

impl<T: Clone + Eq + Ord + Hash + fmt::Debug> BddAtom for T {}

/// The terminal algebra of a BDD: a bounded lattice with complement.
///
/// `union`/`intersect`/`negate` must be the set-theoretic operations of
/// whatever the leaf denotes; in particular `union` and `intersect` must be
/// commutative so that structurally canonical trees stay order-insensitive.
pub trait Leaf: Clone + Eq + Ord + Hash + fmt::Debug {
    fn bottom() -> Self;
    fn top() -> Self;
    fn is_bottom(&self) -> bool;
    fn is_top(&self) -> bool;
    fn union(&self, other: &Self) -> Self;
    fn intersect(&self, other: &Self) -> Self;
    fn negate(&self) -> Self;

    fn diff(&self, other: &Self) -> Self {
        self.intersect(&other.negate())
    }
}

impl Leaf for bool {
    fn bottom() -> Self {
        false
    }

    fn top() -> Self {
        true
    }

    fn is_bottom(&self) -> bool {
        !*self
    }

    fn is_top(&self) -> bool {
        *self
    }

    fn union(&self, other: &Self) -> Self {
        *self || *other
    }

    fn intersect(&self, other: &Self) -> Self {
        *self && *other
    }

    fn negate(&self) -> Self {
        !*self
    }
}

// =============================================================================
// BDD
// =============================================================================

/// A binary decision diagram over atoms `A` with terminal algebra `L`.
///
/// `Node { atom, pos, neg }` denotes `(atom ∧ pos) ∨ (¬atom ∧ neg)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bdd<A, L> {
    Leaf(L),
    Node {
        atom: A,
        pos: Arc<Bdd<A, L>>,
        neg: Arc<Bdd<A, L>>,
    },
}

/// One conjunction of a DNF view: positive atoms, negated atoms and the
/// terminal they guard. Coclauses with a bottom terminal are never produced.
#[derive(Clone, Debug)]
pub struct Coclause<A, L> {
    pub pos: SmallVec<[A; 4]>,
    pub neg: SmallVec<[A; 4]>,
    pub leaf: L,
}

impl<A: BddAtom, L: Leaf> Bdd<A, L> {
    pub fn bottom() -> Self {
        Bdd::Leaf(L::bottom())
    }

    pub fn top() -> Self {
        Bdd::Leaf(L::top())
    }

    pub fn leaf(leaf: L) -> Self {
        Bdd::Leaf(leaf)
    }

    /// The BDD denoting exactly `atom`.
    pub fn atom(atom: A) -> Self {
        Self::node(atom, Self::top(), Self::bottom())
    }

    /// The BDD denoting exactly `¬atom`.
    pub fn negated_atom(atom: A) -> Self {
        Self::node(atom, Self::bottom(), Self::top())
    }

    /// Canonicalizing node constructor: equal children collapse.
    fn node(atom: A, pos: Self, neg: Self) -> Self {
        if pos == neg {
            pos
        } else {
            Bdd::Node {
                atom,
                pos: Arc::new(pos),
                neg: Arc::new(neg),
            }
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Bdd::Leaf(l) if l.is_bottom())
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Bdd::Leaf(l) if l.is_top())
    }

    pub fn union(&self, other: &Self) -> Self {
        match (self, other) {
            (Bdd::Leaf(a), Bdd::Leaf(b)) => Bdd::Leaf(Leaf::union(a, b)),
            (Bdd::Leaf(l), Bdd::Node { atom, pos, neg }) => {
                if l.is_bottom() {
                    other.clone()
                } else if l.is_top() {
                    Self::top()
                } else {
                    Self::node(atom.clone(), pos.union(self), neg.union(self))
                }
            }
            (Bdd::Node { atom, pos, neg }, Bdd::Leaf(l)) => {
                if l.is_bottom() {
                    self.clone()
                } else if l.is_top() {
                    Self::top()
                } else {
                    Self::node(atom.clone(), pos.union(other), neg.union(other))
                }
            }
            (
                Bdd::Node {
                    atom: a1,
                    pos: p1,
                    neg: n1,
                },
                Bdd::Node {
                    atom: a2,
                    pos: p2,
                    neg: n2,
                },
            ) => match a1.cmp(a2) {
                Ordering::Equal => Self::node(a1.clone(), p1.union(p2), n1.union(n2)),
                Ordering::Less => Self::node(a1.clone(), p1.union(other), n1.union(other)),
                Ordering::Greater => Self::node(a2.clone(), self.union(p2), self.union(n2)),
            },
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        match (self, other) {
            (Bdd::Leaf(a), Bdd::Leaf(b)) => Bdd::Leaf(Leaf::intersect(a, b)),
            (Bdd::Leaf(l), Bdd::Node { atom, pos, neg }) => {
                if l.is_bottom() {
                    Self::bottom()
                } else if l.is_top() {
                    other.clone()
                } else {
                    Self::node(atom.clone(), pos.intersect(self), neg.intersect(self))
                }
            }
            (Bdd::Node { atom, pos, neg }, Bdd::Leaf(l)) => {
                if l.is_bottom() {
                    Self::bottom()
                } else if l.is_top() {
                    self.clone()
                } else {
                    Self::node(atom.clone(), pos.intersect(other), neg.intersect(other))
                }
            }
            (
                Bdd::Node {
                    atom: a1,
                    pos: p1,
                    neg: n1,
                },
                Bdd::Node {
                    atom: a2,
                    pos: p2,
                    neg: n2,
                },
            ) => match a1.cmp(a2) {
                Ordering::Equal => Self::node(a1.clone(), p1.intersect(p2), n1.intersect(n2)),
                Ordering::Less => Self::node(a1.clone(), p1.intersect(other), n1.intersect(other)),
                Ordering::Greater => Self::node(a2.clone(), self.intersect(p2), self.intersect(n2)),
            },
        }
    }

    pub fn negate(&self) -> Self {
        match self {
            Bdd::Leaf(l) => Bdd::Leaf(l.negate()),
            Bdd::Node { atom, pos, neg } => {
                Self::node(atom.clone(), pos.negate(), neg.negate())
            }
        }
    }

    pub fn diff(&self, other: &Self) -> Self {
        self.intersect(&other.negate())
    }

    /// Flatten into DNF coclauses, skipping branches that end in the bottom
    /// terminal. The result is deterministic: coclauses appear in the order
    /// of a positive-first depth-first walk.
    pub fn coclauses(&self) -> Vec<Coclause<A, L>> {
        let mut out = Vec::new();
        let mut pos = SmallVec::new();
        let mut neg = SmallVec::new();
        self.collect_coclauses(&mut pos, &mut neg, &mut out);
        out
    }

    fn collect_coclauses(
        &self,
        pos: &mut SmallVec<[A; 4]>,
        neg: &mut SmallVec<[A; 4]>,
        out: &mut Vec<Coclause<A, L>>,
    ) {
        match self {
            Bdd::Leaf(l) => {
                if !l.is_bottom() {
                    out.push(Coclause {
                        pos: pos.clone(),
                        neg: neg.clone(),
                        leaf: l.clone(),
                    });
                }
            }
            Bdd::Node {
                atom,
                pos: p,
                neg: n,
            } => {
                pos.push(atom.clone());
                p.collect_coclauses(pos, neg, out);
                pos.pop();
                neg.push(atom.clone());
                n.collect_coclauses(pos, neg, out);
                neg.pop();
            }
        }
    }

    /// Visit every atom in the tree (not only those on live coclauses).
    pub fn visit_atoms(&self, f: &mut impl FnMut(&A)) {
        match self {
            Bdd::Leaf(_) => {}
            Bdd::Node { atom, pos, neg } => {
                f(atom);
                pos.visit_atoms(f);
                neg.visit_atoms(f);
            }
        }
    }

    /// Visit every terminal in the tree.
    pub fn visit_leaves(&self, f: &mut impl FnMut(&L)) {
        match self {
            Bdd::Leaf(l) => f(l),
            Bdd::Node { pos, neg, .. } => {
                pos.visit_leaves(f);
                neg.visit_leaves(f);
            }
        }
    }

    /// Rebuild the BDD with every atom passed through `f`, re-canonicalizing
    /// as the mapping may reorder atoms.
    pub fn map_atoms(&self, f: &mut impl FnMut(&A) -> A) -> Self {
        let mut out = Self::bottom();
        for c in self.coclauses() {
            let mut clause = Self::leaf(c.leaf);
            for a in &c.pos {
                clause = clause.intersect(&Self::atom(f(a)));
            }
            for a in &c.neg {
                clause = clause.intersect(&Self::negated_atom(f(a)));
            }
            out = out.union(&clause);
        }
        out
    }
}

/// A BDD is itself a leaf algebra, which is what lets a variable-layer BDD
/// carry a constructor DNF at its terminals.
impl<A: BddAtom, L: Leaf> Leaf for Bdd<A, L> {
    fn bottom() -> Self {
        Bdd::bottom()
    }

    fn top() -> Self {
        Bdd::top()
    }

    fn is_bottom(&self) -> bool {
        Bdd::is_bottom(self)
    }

    fn is_top(&self) -> bool {
        Bdd::is_top(self)
    }

    fn union(&self, other: &Self) -> Self {
        Bdd::union(self, other)
    }

    fn intersect(&self, other: &Self) -> Self {
        Bdd::intersect(self, other)
    }

    fn negate(&self) -> Self {
        Bdd::negate(self)
    }
}
