//! The type reference store: hash-consed, process-wide, append-only.
//!
//! Interning serializes through the dedup map; resolution takes a short read
//! lock on the node table and hands out `Arc`s, so published references are
//! cheap to share across threads. Recursive types are built through
//! [`TypeStore::reserve`]/[`TypeStore::define`] (or the
//! [`TypeStore::fresh_recursive`] wrapper): a reserved id resolves to the
//! empty placeholder until defined, so builders must only *embed* it inside
//! constructor atoms, never resolve it.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tyset_common::{Interner, Symbol};

use crate::bdd::Bdd;
use crate::dnf::atoms::AtomSet;
use crate::dnf::bits::{BitsAtom, BitsDnf};
use crate::dnf::function::{FnAtom, FnDnf};
use crate::dnf::interval::IntervalSet;
use crate::dnf::map::{MapAtom, MapDnf};
use crate::dnf::record::{RecordAtom, RecordDnf};
use crate::dnf::tuple::{TupleAtom, TupleDnf};
use crate::ty::{ArityGroup, TyRec};
use crate::types::{TypeId, TypeVar};

/// The process-wide intern table mapping opaque ids to canonical type
/// records, together with the symbol and type-variable name tables.
#[derive(Debug)]
pub struct TypeStore {
    recs: RwLock<Vec<Arc<TyRec>>>,
    dedup: DashMap<Arc<TyRec>, TypeId>,
    syms: Interner,
    vars: Interner,
}

impl TypeStore {
    pub fn new() -> Self {
        let store = TypeStore {
            recs: RwLock::new(Vec::new()),
            dedup: DashMap::new(),
            syms: Interner::new(),
            vars: Interner::new(),
        };
        // Pre-register the constants backing TypeId::EMPTY and TypeId::ANY.
        assert_eq!(store.intern(TyRec::empty()), TypeId::EMPTY);
        assert_eq!(store.intern(TyRec::any()), TypeId::ANY);
        store
    }

    // =========================================================================
    // Interning
    // =========================================================================

    /// Intern a record, returning the existing reference for a structurally
    /// equal record if there is one.
    pub fn intern(&self, rec: TyRec) -> TypeId {
        let key = Arc::new(rec);
        if let Some(id) = self.dedup.get(&key) {
            return *id;
        }
        *self.dedup.entry(Arc::clone(&key)).or_insert_with(|| {
            let mut recs = self.recs.write().expect("type store poisoned");
            let id = TypeId(recs.len() as u32);
            recs.push(key.clone());
            id
        })
    }

    /// Resolve a reference. Total for every id this store handed out; a
    /// foreign id is a fatal caller bug.
    pub fn resolve(&self, id: TypeId) -> Arc<TyRec> {
        let recs = self.recs.read().expect("type store poisoned");
        recs.get(id.0 as usize)
            .cloned()
            .unwrap_or_else(|| panic!("dangling type reference {id:?}"))
    }

    /// Allocate an id that resolves to the empty placeholder until `define`d.
    /// Reserved ids bypass deduplication.
    pub fn reserve(&self) -> TypeId {
        let mut recs = self.recs.write().expect("type store poisoned");
        let id = TypeId(recs.len() as u32);
        recs.push(Arc::new(TyRec::empty()));
        id
    }

    /// Give a reserved id its record. Must be called exactly once per
    /// reserved id, before the id escapes to other queries. The record is
    /// registered for deduplication so that algebra results that rebuild it
    /// (double negation, identity substitutions) resolve back to `id`; an id
    /// already mapped to an equal record keeps precedence.
    pub fn define(&self, id: TypeId, rec: TyRec) {
        let arc = Arc::new(rec);
        {
            let mut recs = self.recs.write().expect("type store poisoned");
            let slot = recs
                .get_mut(id.0 as usize)
                .unwrap_or_else(|| panic!("define of unreserved reference {id:?}"));
            *slot = Arc::clone(&arc);
        }
        // The node lock is released first: intern takes the dedup shard and
        // then the node lock, and nesting them here in the opposite order
        // would deadlock.
        self.dedup.entry(arc).or_insert(id);
    }

    /// Build a (potentially self-referential) type: `mk` receives the id the
    /// result will have and may embed it inside constructor atoms. If the
    /// built record does not actually reference the id, the record is
    /// interned normally so non-recursive uses keep hash-consing.
    pub fn fresh_recursive(&self, mk: impl FnOnce(TypeId) -> TyRec) -> TypeId {
        let id = self.reserve();
        let rec = mk(id);
        self.define(id, rec.clone());
        if crate::substitute::type_references(self, id, id) {
            id
        } else {
            self.intern(rec)
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub fn symbol(&self, name: &str) -> Symbol {
        self.syms.intern(name)
    }

    pub fn symbol_name(&self, sym: Symbol) -> Arc<str> {
        self.syms.resolve(sym)
    }

    pub fn type_var(&self, name: &str) -> TypeVar {
        TypeVar(self.vars.intern(name).0)
    }

    pub fn type_var_name(&self, var: TypeVar) -> Arc<str> {
        self.vars.resolve(Symbol(var.0))
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn any(&self) -> TypeId {
        TypeId::ANY
    }

    pub fn empty(&self) -> TypeId {
        TypeId::EMPTY
    }

    /// Any atom.
    pub fn atom_any(&self) -> TypeId {
        self.intern(TyRec::from_atoms(Bdd::top()))
    }

    /// The singleton atom `'name'`.
    pub fn atom_lit(&self, name: &str) -> TypeId {
        let sym = self.symbol(name);
        self.intern(TyRec::from_atoms(Bdd::leaf(AtomSet::singleton(sym))))
    }

    /// A finite set of atoms.
    pub fn atom_set(&self, syms: impl IntoIterator<Item = Symbol>) -> TypeId {
        self.intern(TyRec::from_atoms(Bdd::leaf(AtomSet::from_syms(syms))))
    }

    /// Any integer.
    pub fn int_any(&self) -> TypeId {
        self.intern(TyRec::from_ints(Bdd::top()))
    }

    /// The singleton integer `n`.
    pub fn int_value(&self, n: i64) -> TypeId {
        self.intern(TyRec::from_ints(Bdd::leaf(IntervalSet::singleton(n))))
    }

    /// The integer range `lo..=hi`; `None` is unbounded.
    pub fn int_range(&self, lo: Option<i64>, hi: Option<i64>) -> TypeId {
        self.intern(TyRec::from_ints(Bdd::leaf(IntervalSet::range(lo, hi))))
    }

    /// Any bitstring.
    pub fn bits_any(&self) -> TypeId {
        self.intern(TyRec::from_bits(Bdd::top()))
    }

    /// Bitstrings whose length is `size + k·unit` (`unit = 0`: exactly
    /// `size`).
    pub fn bits(&self, size: u64, unit: u64) -> TypeId {
        self.intern(TyRec::from_bits(Bdd::leaf(BitsDnf::atom(BitsAtom {
            size,
            unit,
        }))))
    }

    /// The tuple `(elems…)`; arity is the element count.
    pub fn tuple(&self, elems: Vec<TypeId>) -> TypeId {
        let arity = elems.len();
        self.intern(TyRec::from_tuples(ArityGroup::from_entry(
            arity,
            Bdd::leaf(TupleDnf::atom(TupleAtom { elems })),
        )))
    }

    /// Any tuple of any arity.
    pub fn tuple_any(&self) -> TypeId {
        self.intern(TyRec::from_tuples(ArityGroup::top()))
    }

    /// The arrow `(domains…) → codomain`; arity is the domain count.
    pub fn fun(&self, domains: Vec<TypeId>, codomain: TypeId) -> TypeId {
        let arity = domains.len();
        self.intern(TyRec::from_funs(ArityGroup::from_entry(
            arity,
            Bdd::leaf(FnDnf::atom(FnAtom { domains, codomain })),
        )))
    }

    /// Any function of any arity.
    pub fn fun_any(&self) -> TypeId {
        self.intern(TyRec::from_funs(ArityGroup::top()))
    }

    /// The record `#name{fields…}`.
    pub fn record(&self, name: &str, fields: Vec<TypeId>) -> TypeId {
        let name = self.symbol(name);
        self.intern(TyRec::from_records(Bdd::leaf(RecordDnf::atom(
            RecordAtom { name, fields },
        ))))
    }

    /// Any record.
    pub fn record_any(&self) -> TypeId {
        self.intern(TyRec::from_records(Bdd::top()))
    }

    /// The map type `#{key => value}`.
    pub fn map(&self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TyRec::from_maps(Bdd::leaf(MapDnf::atom(MapAtom {
            key,
            value,
        }))))
    }

    /// Any map.
    pub fn map_any(&self) -> TypeId {
        self.intern(TyRec::from_maps(Bdd::top()))
    }

    /// A bare type variable.
    pub fn var(&self, v: TypeVar) -> TypeId {
        self.intern(TyRec::var(v))
    }

    /// `'true' ∨ 'false'`.
    pub fn boolean(&self) -> TypeId {
        self.union(self.atom_lit("true"), self.atom_lit("false"))
    }

    /// Proper lists of `elem`: `rec X. 'nil' ∨ (elem, X)`.
    pub fn list(&self, elem: TypeId) -> TypeId {
        let nil = self.atom_lit("nil");
        self.fresh_recursive(|this| {
            let cons = self.tuple(vec![elem, this]);
            self.resolve(nil).union(&self.resolve(cons))
        })
    }

    // =========================================================================
    // Boolean algebra over references
    // =========================================================================

    pub fn union(&self, a: TypeId, b: TypeId) -> TypeId {
        if a == b || b == TypeId::EMPTY {
            return a;
        }
        if a == TypeId::EMPTY {
            return b;
        }
        let (ra, rb) = (self.resolve(a), self.resolve(b));
        self.intern(ra.union(&rb))
    }

    pub fn intersect(&self, a: TypeId, b: TypeId) -> TypeId {
        if a == b || b == TypeId::ANY {
            return a;
        }
        if a == TypeId::ANY {
            return b;
        }
        let (ra, rb) = (self.resolve(a), self.resolve(b));
        self.intern(ra.intersect(&rb))
    }

    pub fn negate(&self, t: TypeId) -> TypeId {
        if t == TypeId::EMPTY {
            return TypeId::ANY;
        }
        if t == TypeId::ANY {
            return TypeId::EMPTY;
        }
        let rt = self.resolve(t);
        self.intern(rt.negate())
    }

    pub fn diff(&self, a: TypeId, b: TypeId) -> TypeId {
        self.intersect(a, self.negate(b))
    }

    pub fn union_all(&self, tys: impl IntoIterator<Item = TypeId>) -> TypeId {
        tys.into_iter()
            .fold(TypeId::EMPTY, |acc, t| self.union(acc, t))
    }

    pub fn intersect_all(&self, tys: impl IntoIterator<Item = TypeId>) -> TypeId {
        tys.into_iter()
            .fold(TypeId::ANY, |acc, t| self.intersect(acc, t))
    }

    // =========================================================================
    // Memo-free queries
    // =========================================================================

    /// The free type variables of `t`.
    pub fn free_variables(&self, t: TypeId) -> std::collections::BTreeSet<TypeVar> {
        crate::substitute::free_variables(self, t)
    }

    /// Does `t` transitively reference `target` through constructor atoms?
    pub fn references(&self, t: TypeId, target: TypeId) -> bool {
        crate::substitute::type_references(self, t, target)
    }

    /// Human-readable rendering for diagnostics.
    pub fn display(&self, t: TypeId) -> String {
        crate::display::render(self, t)
    }

    /// Number of interned records (including reserved ids).
    pub fn len(&self) -> usize {
        self.recs.read().expect("type store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}
