//! The type record: the sum of all constructor DNFs.
//!
//! A `TyRec` has one slot per constructor. Each slot is a BDD over type
//! variables whose terminals carry the constructor's own DNF, so a bare
//! variable distributes into every slot (`α = ⋃ₖ α ∧ k-any`) and the Boolean
//! algebra lifts componentwise. Tuple and function slots are additionally
//! keyed by arity with a `default` part covering every arity without an
//! explicit entry, which keeps complement closed over the infinite arity
//! space.

use std::collections::BTreeMap;

use crate::bdd::{Bdd, Leaf};
use crate::dnf::atoms::AtomSet;
use crate::dnf::bits::BitsDnf;
use crate::dnf::function::FnDnf;
use crate::dnf::interval::IntervalSet;
use crate::dnf::map::MapDnf;
use crate::dnf::record::RecordDnf;
use crate::dnf::tuple::TupleDnf;
use crate::types::TypeVar;

/// A BDD whose atoms are type variables and whose terminals carry `L`.
pub type VarBdd<L> = Bdd<TypeVar, L>;

// =============================================================================
// Arity-keyed slot groups
// =============================================================================

/// An arity-indexed family of variable BDDs with a `default` for every arity
/// not explicitly keyed.
///
/// Canonical form: no entry equals the default, so structural equality is
/// meaningful for interning. Constructor atoms only ever live in entries (a
/// concrete tuple or arrow has a concrete arity); defaults carry variables
/// and Boolean terminals only.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArityGroup<D> {
    default: VarBdd<D>,
    entries: BTreeMap<usize, VarBdd<D>>,
}

impl<D: Leaf> ArityGroup<D> {
    pub fn bottom() -> Self {
        ArityGroup {
            default: VarBdd::bottom(),
            entries: BTreeMap::new(),
        }
    }

    pub fn top() -> Self {
        ArityGroup {
            default: VarBdd::top(),
            entries: BTreeMap::new(),
        }
    }

    pub fn is_bottom(&self) -> bool {
        self.default.is_bottom() && self.entries.is_empty()
    }

    pub fn is_top(&self) -> bool {
        self.default.is_top() && self.entries.is_empty()
    }

    /// The group that is `bdd` at exactly `arity` and empty elsewhere.
    pub fn from_entry(arity: usize, bdd: VarBdd<D>) -> Self {
        let mut group = Self::bottom();
        if bdd != group.default {
            group.entries.insert(arity, bdd);
        }
        group
    }

    /// The group that is `default` everywhere except the `excluded` arities,
    /// which are empty. Used to re-embed a default part whose group had
    /// explicit entries.
    pub fn from_default(default: VarBdd<D>, excluded: impl IntoIterator<Item = usize>) -> Self {
        let mut entries = BTreeMap::new();
        if !default.is_bottom() {
            for arity in excluded {
                entries.insert(arity, VarBdd::bottom());
            }
        }
        ArityGroup { default, entries }
    }

    pub fn default_part(&self) -> &VarBdd<D> {
        &self.default
    }

    pub fn entries(&self) -> &BTreeMap<usize, VarBdd<D>> {
        &self.entries
    }

    /// The BDD governing one arity.
    pub fn entry(&self, arity: usize) -> &VarBdd<D> {
        self.entries.get(&arity).unwrap_or(&self.default)
    }

    fn zip(&self, other: &Self, f: impl Fn(&VarBdd<D>, &VarBdd<D>) -> VarBdd<D>) -> Self {
        let default = f(&self.default, &other.default);
        let mut entries = BTreeMap::new();
        for &arity in self.entries.keys().chain(other.entries.keys()) {
            let merged = f(self.entry(arity), other.entry(arity));
            if merged != default {
                entries.insert(arity, merged);
            }
        }
        ArityGroup { default, entries }
    }

    fn map(&self, f: impl Fn(&VarBdd<D>) -> VarBdd<D>) -> Self {
        let default = f(&self.default);
        let mut entries = BTreeMap::new();
        for (&arity, bdd) in &self.entries {
            let mapped = f(bdd);
            if mapped != default {
                entries.insert(arity, mapped);
            }
        }
        ArityGroup { default, entries }
    }

    pub fn union(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a.union(b))
    }

    pub fn intersect(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a.intersect(b))
    }

    pub fn negate(&self) -> Self {
        self.map(|b| b.negate())
    }
}

// =============================================================================
// Type record
// =============================================================================

/// The canonical type record: one slot per constructor.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TyRec {
    pub(crate) atoms: VarBdd<AtomSet>,
    pub(crate) ints: VarBdd<IntervalSet>,
    pub(crate) bits: VarBdd<BitsDnf>,
    pub(crate) tuples: ArityGroup<TupleDnf>,
    pub(crate) funs: ArityGroup<FnDnf>,
    pub(crate) records: VarBdd<RecordDnf>,
    pub(crate) maps: VarBdd<MapDnf>,
}

impl TyRec {
    pub fn empty() -> Self {
        TyRec {
            atoms: VarBdd::bottom(),
            ints: VarBdd::bottom(),
            bits: VarBdd::bottom(),
            tuples: ArityGroup::bottom(),
            funs: ArityGroup::bottom(),
            records: VarBdd::bottom(),
            maps: VarBdd::bottom(),
        }
    }

    pub fn any() -> Self {
        TyRec {
            atoms: VarBdd::top(),
            ints: VarBdd::top(),
            bits: VarBdd::top(),
            tuples: ArityGroup::top(),
            funs: ArityGroup::top(),
            records: VarBdd::top(),
            maps: VarBdd::top(),
        }
    }

    /// Structurally the empty record. Structural emptiness implies semantic
    /// emptiness; the converse is the emptiness engine's job.
    pub fn is_bottom(&self) -> bool {
        self.atoms.is_bottom()
            && self.ints.is_bottom()
            && self.bits.is_bottom()
            && self.tuples.is_bottom()
            && self.funs.is_bottom()
            && self.records.is_bottom()
            && self.maps.is_bottom()
    }

    pub fn is_top(&self) -> bool {
        self.atoms.is_top()
            && self.ints.is_top()
            && self.bits.is_top()
            && self.tuples.is_top()
            && self.funs.is_top()
            && self.records.is_top()
            && self.maps.is_top()
    }

    /// A bare variable: present in every slot.
    pub fn var(v: TypeVar) -> Self {
        TyRec {
            atoms: VarBdd::atom(v),
            ints: VarBdd::atom(v),
            bits: VarBdd::atom(v),
            tuples: ArityGroup::from_default(VarBdd::atom(v), std::iter::empty()),
            funs: ArityGroup::from_default(VarBdd::atom(v), std::iter::empty()),
            records: VarBdd::atom(v),
            maps: VarBdd::atom(v),
        }
    }

    // =========================================================================
    // Slot injections
    // =========================================================================

    pub fn from_atoms(atoms: VarBdd<AtomSet>) -> Self {
        TyRec {
            atoms,
            ..Self::empty()
        }
    }

    pub fn from_ints(ints: VarBdd<IntervalSet>) -> Self {
        TyRec {
            ints,
            ..Self::empty()
        }
    }

    pub fn from_bits(bits: VarBdd<BitsDnf>) -> Self {
        TyRec {
            bits,
            ..Self::empty()
        }
    }

    pub fn from_tuples(tuples: ArityGroup<TupleDnf>) -> Self {
        TyRec {
            tuples,
            ..Self::empty()
        }
    }

    pub fn from_funs(funs: ArityGroup<FnDnf>) -> Self {
        TyRec {
            funs,
            ..Self::empty()
        }
    }

    pub fn from_records(records: VarBdd<RecordDnf>) -> Self {
        TyRec {
            records,
            ..Self::empty()
        }
    }

    pub fn from_maps(maps: VarBdd<MapDnf>) -> Self {
        TyRec {
            maps,
            ..Self::empty()
        }
    }

    // =========================================================================
    // Boolean algebra (componentwise)
    // =========================================================================

    pub fn union(&self, other: &Self) -> Self {
        TyRec {
            atoms: self.atoms.union(&other.atoms),
            ints: self.ints.union(&other.ints),
            bits: self.bits.union(&other.bits),
            tuples: self.tuples.union(&other.tuples),
            funs: self.funs.union(&other.funs),
            records: self.records.union(&other.records),
            maps: self.maps.union(&other.maps),
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        TyRec {
            atoms: self.atoms.intersect(&other.atoms),
            ints: self.ints.intersect(&other.ints),
            bits: self.bits.intersect(&other.bits),
            tuples: self.tuples.intersect(&other.tuples),
            funs: self.funs.intersect(&other.funs),
            records: self.records.intersect(&other.records),
            maps: self.maps.intersect(&other.maps),
        }
    }

    pub fn negate(&self) -> Self {
        TyRec {
            atoms: self.atoms.negate(),
            ints: self.ints.negate(),
            bits: self.bits.negate(),
            tuples: self.tuples.negate(),
            funs: self.funs.negate(),
            records: self.records.negate(),
            maps: self.maps.negate(),
        }
    }

    pub fn diff(&self, other: &Self) -> Self {
        self.intersect(&other.negate())
    }
}
