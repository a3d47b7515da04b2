//! Capture-avoiding substitution of type variables, and the reference /
//! variable walks shared with the store.
//!
//! Substituting into a slot replaces each variable literal of a coclause by
//! the (projection of the) substituted type and rebuilds the slot with the
//! Boolean algebra, which re-canonicalizes everything. Recursive reference
//! groups are detected first and rebuilt through reserved ids, so
//! self-references inside constructor atoms land on the substituted copies
//! instead of looping the walk.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use tyset_common::limits;

use crate::bdd::Bdd;
use crate::dnf::function::FnAtom;
use crate::dnf::map::MapAtom;
use crate::dnf::record::RecordAtom;
use crate::dnf::tuple::TupleAtom;
use crate::intern::TypeStore;
use crate::ty::{ArityGroup, TyRec, VarBdd};
use crate::types::{TypeId, TypeVar};

// =============================================================================
// Substitution maps
// =============================================================================

/// A finite map from flexible type variables to types.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: FxHashMap<TypeVar, TypeId>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    pub fn insert(&mut self, var: TypeVar, ty: TypeId) -> &mut Self {
        self.map.insert(var, ty);
        self
    }

    pub fn get(&self, var: TypeVar) -> Option<TypeId> {
        self.map.get(&var).copied()
    }

    pub fn contains(&self, var: TypeVar) -> bool {
        self.map.contains_key(&var)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVar, TypeId)> + '_ {
        self.map.iter().map(|(v, t)| (*v, *t))
    }
}

impl FromIterator<(TypeVar, TypeId)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (TypeVar, TypeId)>>(iter: I) -> Self {
        Substitution {
            map: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Walks
// =============================================================================

/// Type references embedded directly in a record's constructor atoms.
pub(crate) fn direct_refs(rec: &TyRec) -> Vec<TypeId> {
    let mut out = Vec::new();
    for part in group_parts(&rec.tuples) {
        part.visit_leaves(&mut |leaf| {
            leaf.visit_atoms(&mut |a: &TupleAtom| out.extend_from_slice(&a.elems));
        });
    }
    for part in group_parts(&rec.funs) {
        part.visit_leaves(&mut |leaf| {
            leaf.visit_atoms(&mut |a: &FnAtom| {
                out.extend_from_slice(&a.domains);
                out.push(a.codomain);
            });
        });
    }
    rec.records.visit_leaves(&mut |leaf| {
        leaf.visit_atoms(&mut |a: &RecordAtom| out.extend_from_slice(&a.fields));
    });
    rec.maps.visit_leaves(&mut |leaf| {
        leaf.visit_atoms(&mut |a: &MapAtom| {
            out.push(a.key);
            out.push(a.value);
        });
    });
    out
}

fn group_parts<D: crate::bdd::Leaf>(group: &ArityGroup<D>) -> impl Iterator<Item = &VarBdd<D>> {
    std::iter::once(group.default_part()).chain(group.entries().values())
}

/// Variable atoms of every slot of one record.
fn rec_vars(rec: &TyRec, out: &mut BTreeSet<TypeVar>) {
    let mut add = |v: &TypeVar| {
        out.insert(*v);
    };
    rec.atoms.visit_atoms(&mut add);
    rec.ints.visit_atoms(&mut add);
    rec.bits.visit_atoms(&mut add);
    for part in group_parts(&rec.tuples) {
        part.visit_atoms(&mut add);
    }
    for part in group_parts(&rec.funs) {
        part.visit_atoms(&mut add);
    }
    rec.records.visit_atoms(&mut add);
    rec.maps.visit_atoms(&mut add);
}

/// The free type variables of `t`, across recursive references.
pub fn free_variables(store: &TypeStore, t: TypeId) -> BTreeSet<TypeVar> {
    let mut vars = BTreeSet::new();
    let mut visited = FxHashSet::default();
    let mut stack = vec![t];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let rec = store.resolve(id);
        rec_vars(&rec, &mut vars);
        stack.extend(direct_refs(&rec));
    }
    vars
}

/// Does `t` reach `target` through one or more constructor-atom references?
/// `t` itself does not count as reached at step zero.
pub(crate) fn type_references(store: &TypeStore, t: TypeId, target: TypeId) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack = direct_refs(&store.resolve(t));
    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        stack.extend(direct_refs(&store.resolve(id)));
    }
    false
}

/// Every reference reachable from `t`, including `t`.
fn reachable(store: &TypeStore, t: TypeId) -> Vec<TypeId> {
    let mut visited = FxHashSet::default();
    let mut stack = vec![t];
    let mut out = Vec::new();
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        out.push(id);
        stack.extend(direct_refs(&store.resolve(id)));
    }
    out
}

// =============================================================================
// Substitution
// =============================================================================

/// Apply `subst` to `t`, returning the (interned) substituted type.
///
/// Simultaneous: images are not themselves substituted. Types not mentioning
/// a substituted variable are returned unchanged, reference included.
pub fn substitute(store: &TypeStore, t: TypeId, subst: &Substitution) -> TypeId {
    if subst.is_empty() {
        return t;
    }
    let mut ctx = SubstCtx {
        store,
        subst,
        done: FxHashMap::default(),
        reserved: FxHashMap::default(),
        changed: FxHashMap::default(),
    };
    // Recursive groups that the substitution touches get their ids up front,
    // so cycles land on the copies.
    for r in reachable(store, t) {
        if ctx.is_changed(r) && type_references(store, r, r) {
            let fresh = store.reserve();
            ctx.reserved.insert(r, fresh);
        }
    }
    ctx.subst_ty(t)
}

struct SubstCtx<'a> {
    store: &'a TypeStore,
    subst: &'a Substitution,
    done: FxHashMap<TypeId, TypeId>,
    reserved: FxHashMap<TypeId, TypeId>,
    changed: FxHashMap<TypeId, bool>,
}

impl<'a> SubstCtx<'a> {
    fn is_changed(&mut self, t: TypeId) -> bool {
        if let Some(&c) = self.changed.get(&t) {
            return c;
        }
        let c = free_variables(self.store, t)
            .iter()
            .any(|v| self.subst.contains(*v));
        self.changed.insert(t, c);
        c
    }

    fn subst_ty(&mut self, t: TypeId) -> TypeId {
        if let Some(&r) = self.done.get(&t) {
            return r;
        }
        if !self.is_changed(t) {
            self.done.insert(t, t);
            return t;
        }
        if let Some(&fresh) = self.reserved.get(&t) {
            // Mark before building: self-references must resolve to the copy.
            self.done.insert(t, fresh);
            let rec = self.store.resolve(t);
            let built =
                stacker::maybe_grow(limits::STACK_RED_ZONE, limits::STACK_GROWTH, || {
                    self.subst_rec(&rec)
                });
            self.store.define(fresh, built);
            fresh
        } else {
            let rec = self.store.resolve(t);
            let built =
                stacker::maybe_grow(limits::STACK_RED_ZONE, limits::STACK_GROWTH, || {
                    self.subst_rec(&rec)
                });
            let id = self.store.intern(built);
            self.done.insert(t, id);
            id
        }
    }

    /// Rebuild one record: per slot, per coclause, substituted variable
    /// images intersect the (recursively substituted) slot embedding.
    fn subst_rec(&mut self, rec: &TyRec) -> TyRec {
        let mut out = TyRec::empty();
        for c in rec.atoms.coclauses() {
            let base = TyRec::from_atoms(Bdd::leaf(c.leaf.clone()));
            out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
        }
        for c in rec.ints.coclauses() {
            let base = TyRec::from_ints(Bdd::leaf(c.leaf.clone()));
            out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
        }
        for c in rec.bits.coclauses() {
            let base = TyRec::from_bits(Bdd::leaf(c.leaf.clone()));
            out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
        }
        for c in rec.records.coclauses() {
            let mapped = c.leaf.map_atoms(&mut |a| RecordAtom {
                name: a.name,
                fields: a.fields.iter().map(|&f| self.subst_ty(f)).collect(),
            });
            let base = TyRec::from_records(Bdd::leaf(mapped));
            out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
        }
        for c in rec.maps.coclauses() {
            let mapped = c.leaf.map_atoms(&mut |a| MapAtom {
                key: self.subst_ty(a.key),
                value: self.subst_ty(a.value),
            });
            let base = TyRec::from_maps(Bdd::leaf(mapped));
            out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
        }
        let tuple_keys: Vec<usize> = rec.tuples.entries().keys().copied().collect();
        for c in rec.tuples.default_part().coclauses() {
            let base = TyRec::from_tuples(ArityGroup::from_default(
                Bdd::leaf(c.leaf.clone()),
                tuple_keys.iter().copied(),
            ));
            out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
        }
        for (&arity, bdd) in rec.tuples.entries() {
            for c in bdd.coclauses() {
                let mapped = c.leaf.map_atoms(&mut |a| TupleAtom {
                    elems: a.elems.iter().map(|&e| self.subst_ty(e)).collect(),
                });
                let base = TyRec::from_tuples(ArityGroup::from_entry(arity, Bdd::leaf(mapped)));
                out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
            }
        }
        let fun_keys: Vec<usize> = rec.funs.entries().keys().copied().collect();
        for c in rec.funs.default_part().coclauses() {
            let base = TyRec::from_funs(ArityGroup::from_default(
                Bdd::leaf(c.leaf.clone()),
                fun_keys.iter().copied(),
            ));
            out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
        }
        for (&arity, bdd) in rec.funs.entries() {
            for c in bdd.coclauses() {
                let mapped = c.leaf.map_atoms(&mut |a| FnAtom {
                    domains: a.domains.iter().map(|&d| self.subst_ty(d)).collect(),
                    codomain: self.subst_ty(a.codomain),
                });
                let base = TyRec::from_funs(ArityGroup::from_entry(arity, Bdd::leaf(mapped)));
                out = out.union(&self.apply_vars(base, &c.pos, &c.neg));
            }
        }
        out
    }

    fn apply_vars(&mut self, base: TyRec, pos: &[TypeVar], neg: &[TypeVar]) -> TyRec {
        let mut out = base;
        for &v in pos {
            out = out.intersect(&self.var_image(v));
        }
        for &v in neg {
            out = out.intersect(&self.var_image(v).negate());
        }
        out
    }

    fn var_image(&mut self, v: TypeVar) -> TyRec {
        match self.subst.get(v) {
            Some(t) => (*self.store.resolve(t)).clone(),
            None => TyRec::var(v),
        }
    }
}
