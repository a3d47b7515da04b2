//! The normalization (tallying) engine.
//!
//! `normalize(t)` produces the constraint-set set whose bundles, when
//! satisfied by a substitution of the flexible variables, make `t` empty.
//! The recursion mirrors the emptiness engine (per slot, per coclause, per
//! constructor walk), but where emptiness answers a Boolean, normalization
//! combines alternatives with **join** and simultaneous obligations with
//! **meet**.
//!
//! Variables are consumed by the ntlv rule: a coclause `⋀ vars ∧ leaf` with
//! a flexible positive `α` can be emptied by `α ≤ ¬rest`, with a flexible
//! negative `α` by `rest ≤ α` (`rest` is the coclause with that literal
//! removed, confined to its slot); the per-variable alternatives join. A
//! coclause whose variables are all fixed behaves like its leaf: fixed
//! variables are rigid and cannot be constrained away.
//!
//! Join and meet short-circuit on their absorbing elements before forcing
//! the other operand; operands are supplied as closures.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tyset_common::limits;

use crate::bdd::Bdd;
use crate::constraints::{ConstraintSet, ConstraintSets};
use crate::dnf::bits::{self, BitsDnf};
use crate::dnf::function::{self, FnDnf};
use crate::dnf::map::{self, MapDnf};
use crate::dnf::record::{self, RecordDnf};
use crate::dnf::tuple::{self, TupleDnf};
use crate::emptiness::EmptyCtx;
use crate::intern::TypeStore;
use crate::recursion::{RecursionGuard, RecursionResult};
use crate::ty::{ArityGroup, TyRec};
use crate::types::{EngineError, QueryOpts, TypeId, TypeVar};

// =============================================================================
// Public interface
// =============================================================================

/// Constraint bundles that make `t` empty; `fixed` variables are rigid.
pub fn normalize(
    store: &TypeStore,
    t: TypeId,
    fixed: &FxHashSet<TypeVar>,
    opts: &QueryOpts,
) -> Result<ConstraintSets, EngineError> {
    trace!(ty = t.0, "normalize query");
    let mut ctx = NormCtx::new(store, fixed, opts);
    ctx.normalize(t)
}

/// Solve the subtype constraints `a ≤ b` for the flexible variables: per
/// constraint, normalize `a ∧ ¬b`; the results must hold simultaneously, so
/// they meet. The empty result means no substitution exists; that is a
/// normal answer, not an error.
pub fn tally(
    store: &TypeStore,
    constraints: &[(TypeId, TypeId)],
    fixed: &FxHashSet<TypeVar>,
    opts: &QueryOpts,
) -> Result<ConstraintSets, EngineError> {
    trace!(count = constraints.len(), "tally query");
    let mut ctx = NormCtx::new(store, fixed, opts);
    let mut acc = ConstraintSets::unit();
    for &(a, b) in constraints {
        if acc.is_none() {
            break;
        }
        let d = store.diff(a, b);
        acc = ctx.meet2(acc, |c| c.normalize(d))?;
    }
    Ok(acc)
}

// =============================================================================
// Query context
// =============================================================================

#[derive(Clone, Debug)]
enum NormMemo {
    /// Under computation: assumed already empty (coinductive hypothesis),
    /// i.e. trivially satisfied.
    Pending,
    Settled(ConstraintSets),
}

/// One tallying query: memo table, budgets, an embedded emptiness context
/// for satisfiability checks on ground bounds.
pub(crate) struct NormCtx<'a> {
    pub(crate) store: &'a TypeStore,
    fixed: &'a FxHashSet<TypeVar>,
    memo: FxHashMap<TypeId, NormMemo>,
    ground: FxHashMap<TypeId, bool>,
    guard: RecursionGuard<TypeId>,
    cancel: Option<Arc<AtomicBool>>,
    empt: EmptyCtx<'a>,
}

impl<'a> NormCtx<'a> {
    pub(crate) fn new(
        store: &'a TypeStore,
        fixed: &'a FxHashSet<TypeVar>,
        opts: &QueryOpts,
    ) -> Self {
        NormCtx {
            store,
            fixed,
            memo: FxHashMap::default(),
            ground: FxHashMap::default(),
            guard: RecursionGuard::with_profile(opts.profile),
            cancel: opts.cancel.clone(),
            empt: EmptyCtx::new(store, opts),
        }
    }

    pub(crate) fn tick(&mut self) -> Result<(), EngineError> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(EngineError::Cancelled);
            }
        }
        if !self.guard.tick() {
            return Err(EngineError::FuelExhausted);
        }
        Ok(())
    }

    pub(crate) fn normalize(&mut self, t: TypeId) -> Result<ConstraintSets, EngineError> {
        match self.memo.get(&t) {
            Some(NormMemo::Settled(sets)) => return Ok(sets.clone()),
            Some(NormMemo::Pending) => return Ok(ConstraintSets::unit()),
            None => {}
        }
        self.memo.insert(t, NormMemo::Pending);
        match self.guard.enter(t) {
            RecursionResult::Entered => {}
            RecursionResult::DepthLimit => {
                self.memo.remove(&t);
                return Err(EngineError::DepthLimit {
                    depth: self.guard.depth(),
                });
            }
            RecursionResult::IterationLimit => {
                self.memo.remove(&t);
                return Err(EngineError::FuelExhausted);
            }
            RecursionResult::CycleDetected => return Ok(ConstraintSets::unit()),
        }
        let rec = self.store.resolve(t);
        let result = stacker::maybe_grow(limits::STACK_RED_ZONE, limits::STACK_GROWTH, || {
            self.rec_normalize(&rec)
        });
        self.guard.leave(t);
        match result {
            Ok(sets) => {
                self.memo.insert(t, NormMemo::Settled(sets.clone()));
                Ok(sets)
            }
            Err(e) => {
                self.memo.remove(&t);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Lazy combinators
    // =========================================================================

    /// `meet` with a suspended right operand: not forced when the left side
    /// is already the absorbing "no solution".
    pub(crate) fn meet2(
        &mut self,
        acc: ConstraintSets,
        rhs: impl FnOnce(&mut Self) -> Result<ConstraintSets, EngineError>,
    ) -> Result<ConstraintSets, EngineError> {
        if acc.is_none() {
            return Ok(acc);
        }
        let other = rhs(self)?;
        self.meet_sets(acc, other)
    }

    fn meet_sets(
        &mut self,
        a: ConstraintSets,
        b: ConstraintSets,
    ) -> Result<ConstraintSets, EngineError> {
        if a.is_trivially_satisfied() {
            return Ok(b);
        }
        if b.is_trivially_satisfied() {
            return Ok(a);
        }
        let mut out = Vec::new();
        for s1 in a.sets() {
            for s2 in b.sets() {
                let merged = ConstraintSet::merge(self.store, s1, s2);
                if merged.has_syntactic_contradiction() {
                    continue;
                }
                if !self.bounds_satisfiable(&merged)? {
                    continue;
                }
                out.push(merged);
            }
        }
        Ok(ConstraintSets::from_vec_pruned(out))
    }

    /// Reject bundles whose ground bound pairs are semantically
    /// contradictory (`lower ≤ upper` fails). Pairs involving variables are
    /// kept conservatively: a later substitution may still satisfy them.
    fn bounds_satisfiable(&mut self, cs: &ConstraintSet) -> Result<bool, EngineError> {
        for (_, b) in cs.iter() {
            if b.lower == TypeId::EMPTY || b.upper == TypeId::ANY {
                continue;
            }
            if self.is_ground(b.lower) && self.is_ground(b.upper) {
                if !self.empt.is_subtype(b.lower, b.upper)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn is_ground(&mut self, t: TypeId) -> bool {
        if let Some(&g) = self.ground.get(&t) {
            return g;
        }
        let g = crate::substitute::free_variables(self.store, t).is_empty();
        self.ground.insert(t, g);
        g
    }

    // =========================================================================
    // Slot dispatch
    // =========================================================================

    /// Meet across slots: every slot must be emptied simultaneously.
    fn rec_normalize(&mut self, rec: &TyRec) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        acc = self.meet2(acc, |c| c.slot_atoms(rec))?;
        acc = self.meet2(acc, |c| c.slot_ints(rec))?;
        acc = self.meet2(acc, |c| c.slot_bits(rec))?;
        acc = self.meet2(acc, |c| c.slot_records(rec))?;
        acc = self.meet2(acc, |c| c.slot_maps(rec))?;
        acc = self.meet2(acc, |c| c.slot_tuples(rec))?;
        acc = self.meet2(acc, |c| c.slot_funs(rec))?;
        Ok(acc)
    }

    fn slot_atoms(&mut self, rec: &TyRec) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for c in rec.atoms.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| {
                let base = TyRec::from_atoms(Bdd::leaf(c.leaf.clone()));
                match ctx.ntlv(&c.pos, &c.neg, base)? {
                    Some(sets) => Ok(sets),
                    // The leaf is a nonempty ground symbol set.
                    None => Ok(ConstraintSets::none()),
                }
            })?;
        }
        Ok(acc)
    }

    fn slot_ints(&mut self, rec: &TyRec) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for c in rec.ints.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| {
                let base = TyRec::from_ints(Bdd::leaf(c.leaf.clone()));
                match ctx.ntlv(&c.pos, &c.neg, base)? {
                    Some(sets) => Ok(sets),
                    None => Ok(ConstraintSets::none()),
                }
            })?;
        }
        Ok(acc)
    }

    fn slot_bits(&mut self, rec: &TyRec) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for c in rec.bits.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| {
                let base = TyRec::from_bits(Bdd::leaf(c.leaf.clone()));
                match ctx.ntlv(&c.pos, &c.neg, base)? {
                    Some(sets) => Ok(sets),
                    None => ctx.bits_leaf(&c.leaf),
                }
            })?;
        }
        Ok(acc)
    }

    fn bits_leaf(&mut self, leaf: &BitsDnf) -> Result<ConstraintSets, EngineError> {
        // Bitstring atoms carry no type references, so the leaf either is
        // empty already or cannot be emptied at all.
        for bc in leaf.coclauses() {
            self.tick()?;
            if !bits::coclause_is_empty(&bc.pos, &bc.neg)? {
                return Ok(ConstraintSets::none());
            }
        }
        Ok(ConstraintSets::unit())
    }

    fn slot_records(&mut self, rec: &TyRec) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for c in rec.records.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| {
                let base = TyRec::from_records(Bdd::leaf(c.leaf.clone()));
                match ctx.ntlv(&c.pos, &c.neg, base)? {
                    Some(sets) => Ok(sets),
                    None => ctx.record_leaf(&c.leaf),
                }
            })?;
        }
        Ok(acc)
    }

    fn record_leaf(&mut self, leaf: &RecordDnf) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for rc in leaf.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| record::coclause_normalize(ctx, &rc.pos, &rc.neg))?;
        }
        Ok(acc)
    }

    fn slot_maps(&mut self, rec: &TyRec) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for c in rec.maps.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| {
                let base = TyRec::from_maps(Bdd::leaf(c.leaf.clone()));
                match ctx.ntlv(&c.pos, &c.neg, base)? {
                    Some(sets) => Ok(sets),
                    None => ctx.map_leaf(&c.leaf),
                }
            })?;
        }
        Ok(acc)
    }

    fn map_leaf(&mut self, leaf: &MapDnf) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for mc in leaf.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| map::coclause_normalize(ctx, &mc.pos, &mc.neg))?;
        }
        Ok(acc)
    }

    fn slot_tuples(&mut self, rec: &TyRec) -> Result<ConstraintSets, EngineError> {
        let keys: Vec<usize> = rec.tuples.entries().keys().copied().collect();
        let mut acc = ConstraintSets::unit();
        for c in rec.tuples.default_part().coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| {
                let base = TyRec::from_tuples(ArityGroup::from_default(
                    Bdd::leaf(c.leaf.clone()),
                    keys.iter().copied(),
                ));
                match ctx.ntlv(&c.pos, &c.neg, base)? {
                    Some(sets) => Ok(sets),
                    // Every value of an unlisted arity inhabits the default.
                    None => Ok(ConstraintSets::none()),
                }
            })?;
        }
        for (&arity, bdd) in rec.tuples.entries() {
            for c in bdd.coclauses() {
                self.tick()?;
                acc = self.meet2(acc, |ctx| {
                    let base =
                        TyRec::from_tuples(ArityGroup::from_entry(arity, Bdd::leaf(c.leaf.clone())));
                    match ctx.ntlv(&c.pos, &c.neg, base)? {
                        Some(sets) => Ok(sets),
                        None => ctx.tuple_leaf(arity, &c.leaf),
                    }
                })?;
            }
        }
        Ok(acc)
    }

    fn tuple_leaf(&mut self, arity: usize, leaf: &TupleDnf) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for tc in leaf.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| {
                tuple::coclause_normalize(ctx, arity, &tc.pos, &tc.neg)
            })?;
        }
        Ok(acc)
    }

    fn slot_funs(&mut self, rec: &TyRec) -> Result<ConstraintSets, EngineError> {
        let keys: Vec<usize> = rec.funs.entries().keys().copied().collect();
        let mut acc = ConstraintSets::unit();
        for c in rec.funs.default_part().coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| {
                let base = TyRec::from_funs(ArityGroup::from_default(
                    Bdd::leaf(c.leaf.clone()),
                    keys.iter().copied(),
                ));
                match ctx.ntlv(&c.pos, &c.neg, base)? {
                    Some(sets) => Ok(sets),
                    None => Ok(ConstraintSets::none()),
                }
            })?;
        }
        for (&arity, bdd) in rec.funs.entries() {
            for c in bdd.coclauses() {
                self.tick()?;
                acc = self.meet2(acc, |ctx| {
                    let base =
                        TyRec::from_funs(ArityGroup::from_entry(arity, Bdd::leaf(c.leaf.clone())));
                    match ctx.ntlv(&c.pos, &c.neg, base)? {
                        Some(sets) => Ok(sets),
                        None => ctx.fn_leaf(&c.leaf),
                    }
                })?;
            }
        }
        Ok(acc)
    }

    fn fn_leaf(&mut self, leaf: &FnDnf) -> Result<ConstraintSets, EngineError> {
        let mut acc = ConstraintSets::unit();
        for fc in leaf.coclauses() {
            self.tick()?;
            acc = self.meet2(acc, |ctx| function::coclause_normalize(ctx, &fc.pos, &fc.neg))?;
        }
        Ok(acc)
    }

    // =========================================================================
    // The ntlv rule
    // =========================================================================

    /// Single out each flexible variable of a coclause in turn and emit the
    /// atomic constraint that empties the coclause through it; the
    /// per-variable alternatives join. Returns `None` when the coclause has
    /// no flexible variable and the leaf must be handled on its own.
    fn ntlv(
        &mut self,
        pos: &[TypeVar],
        neg: &[TypeVar],
        base: TyRec,
    ) -> Result<Option<ConstraintSets>, EngineError> {
        let has_flex = pos
            .iter()
            .chain(neg.iter())
            .any(|v| !self.fixed.contains(v));
        if !has_flex {
            return Ok(None);
        }
        let mut acc = ConstraintSets::none();
        for (idx, &v) in pos.iter().enumerate() {
            if self.fixed.contains(&v) || acc.is_trivially_satisfied() {
                continue;
            }
            self.tick()?;
            let mut rest = base.clone();
            for (j, &pv) in pos.iter().enumerate() {
                if j != idx {
                    rest = rest.intersect(&TyRec::var(pv));
                }
            }
            for &nv in neg {
                rest = rest.intersect(&TyRec::var(nv).negate());
            }
            let rest_id = self.store.intern(rest);
            let upper = self.store.negate(rest_id);
            acc = acc.join(ConstraintSets::singleton(ConstraintSet::with_upper(v, upper)));
        }
        for (idx, &v) in neg.iter().enumerate() {
            if self.fixed.contains(&v) || acc.is_trivially_satisfied() {
                continue;
            }
            self.tick()?;
            let mut rest = base.clone();
            for &pv in pos {
                rest = rest.intersect(&TyRec::var(pv));
            }
            for (j, &nv) in neg.iter().enumerate() {
                if j != idx {
                    rest = rest.intersect(&TyRec::var(nv).negate());
                }
            }
            let rest_id = self.store.intern(rest);
            acc = acc.join(ConstraintSets::singleton(ConstraintSet::with_lower(v, rest_id)));
        }
        Ok(Some(acc))
    }
}
