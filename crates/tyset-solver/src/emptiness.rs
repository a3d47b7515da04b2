//! The emptiness engine.
//!
//! `is_empty` decides whether a type denotes no values at all, which is the
//! whole subtype relation (`a ≤ b ⟺ a ∧ ¬b = ∅`). Recursion through the
//! store is guarded by a per-query memo table: a reference found `Pending`
//! is assumed empty (the coinductive hypothesis: we are computing a
//! greatest fixpoint of non-emptiness witnesses), and the entry is settled
//! with the computed answer afterwards.
//!
//! Type variables do not influence emptiness: a coclause `⋀ vars ∧ leaf` is
//! empty for every variable assignment iff its leaf is empty (an assignment
//! can always inflate a variable to the slot's top), and contradictory
//! variable literals never survive BDD canonicalization. Tallying, not
//! emptiness, is where variables carry information.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::FxHashMap;
use tracing::trace;
use tyset_common::limits;

use crate::dnf::{bits, function, map, record, tuple};
use crate::intern::TypeStore;
use crate::recursion::{RecursionGuard, RecursionResult};
use crate::ty::TyRec;
use crate::types::{EngineError, QueryOpts, TypeId};

// =============================================================================
// Public checker
// =============================================================================

/// Emptiness and subtype queries over a store.
///
/// Each call builds its own memo table; the checker itself only carries the
/// configuration, so it is cheap and reusable.
pub struct SubtypeChecker<'a> {
    store: &'a TypeStore,
    opts: QueryOpts,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(store: &'a TypeStore) -> Self {
        SubtypeChecker {
            store,
            opts: QueryOpts::default(),
        }
    }

    pub fn with_opts(store: &'a TypeStore, opts: QueryOpts) -> Self {
        SubtypeChecker { store, opts }
    }

    /// Does `t` denote the empty set of values?
    pub fn is_empty(&self, t: TypeId) -> Result<bool, EngineError> {
        trace!(ty = t.0, "is_empty query");
        let mut ctx = EmptyCtx::new(self.store, &self.opts);
        ctx.is_empty(t)
    }

    /// Is every value of `a` a value of `b`?
    pub fn is_subtype_of(&self, a: TypeId, b: TypeId) -> Result<bool, EngineError> {
        trace!(lhs = a.0, rhs = b.0, "subtype query");
        let mut ctx = EmptyCtx::new(self.store, &self.opts);
        ctx.is_subtype(a, b)
    }

    /// Do `a` and `b` denote the same set of values?
    pub fn is_equiv(&self, a: TypeId, b: TypeId) -> Result<bool, EngineError> {
        let mut ctx = EmptyCtx::new(self.store, &self.opts);
        Ok(ctx.is_subtype(a, b)? && ctx.is_subtype(b, a)?)
    }
}

// =============================================================================
// Query context
// =============================================================================

#[derive(Clone, Copy, Debug)]
enum MemoEntry {
    /// Under computation: assumed empty (coinductive hypothesis).
    Pending,
    Settled(bool),
}

/// One emptiness query: memo table, budgets, cancellation.
pub(crate) struct EmptyCtx<'a> {
    pub(crate) store: &'a TypeStore,
    memo: FxHashMap<TypeId, MemoEntry>,
    guard: RecursionGuard<TypeId>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> EmptyCtx<'a> {
    pub(crate) fn new(store: &'a TypeStore, opts: &QueryOpts) -> Self {
        EmptyCtx {
            store,
            memo: FxHashMap::default(),
            guard: RecursionGuard::with_profile(opts.profile),
            cancel: opts.cancel.clone(),
        }
    }

    /// Spend one unit of fuel and poll cancellation. Called at coclause
    /// boundaries and walk steps.
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

    pub(crate) fn is_subtype(&mut self, a: TypeId, b: TypeId) -> Result<bool, EngineError> {
        let d = self.store.diff(a, b);
        self.is_empty(d)
    }

    pub(crate) fn is_empty(&mut self, t: TypeId) -> Result<bool, EngineError> {
        match self.memo.get(&t) {
            Some(MemoEntry::Settled(v)) => return Ok(*v),
            Some(MemoEntry::Pending) => return Ok(true),
            None => {}
        }
        self.memo.insert(t, MemoEntry::Pending);
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
            // The memo table intercepts recursion before the guard can.
            RecursionResult::CycleDetected => return Ok(true),
        }
        let rec = self.store.resolve(t);
        let result = stacker::maybe_grow(limits::STACK_RED_ZONE, limits::STACK_GROWTH, || {
            self.rec_is_empty(&rec)
        });
        self.guard.leave(t);
        match result {
            Ok(v) => {
                self.memo.insert(t, MemoEntry::Settled(v));
                Ok(v)
            }
            Err(e) => {
                self.memo.remove(&t);
                Err(e)
            }
        }
    }

    /// Conjunction of per-slot emptiness, cheapest slots first.
    fn rec_is_empty(&mut self, rec: &TyRec) -> Result<bool, EngineError> {
        // Atom and integer slots carry their sets directly at the terminals,
        // and canonicalization collapses all-bottom trees, so structural
        // bottom is exact for them.
        if !rec.atoms.is_bottom() || !rec.ints.is_bottom() {
            return Ok(false);
        }
        for c in rec.bits.coclauses() {
            for bc in c.leaf.coclauses() {
                self.tick()?;
                if !bits::coclause_is_empty(&bc.pos, &bc.neg)? {
                    return Ok(false);
                }
            }
        }
        for c in rec.records.coclauses() {
            for rc in c.leaf.coclauses() {
                self.tick()?;
                if !record::coclause_is_empty(self, &rc.pos, &rc.neg)? {
                    return Ok(false);
                }
            }
        }
        for c in rec.maps.coclauses() {
            for mc in c.leaf.coclauses() {
                self.tick()?;
                if !map::coclause_is_empty(self, &mc.pos, &mc.neg)? {
                    return Ok(false);
                }
            }
        }
        // Arity-group defaults carry no constructor atoms, so any surviving
        // default coclause denotes every value of an unlisted arity.
        if !rec.tuples.default_part().is_bottom() {
            return Ok(false);
        }
        for (&arity, bdd) in rec.tuples.entries() {
            for c in bdd.coclauses() {
                for tc in c.leaf.coclauses() {
                    self.tick()?;
                    if !tuple::coclause_is_empty(self, arity, &tc.pos, &tc.neg)? {
                        return Ok(false);
                    }
                }
            }
        }
        if !rec.funs.default_part().is_bottom() {
            return Ok(false);
        }
        for bdd in rec.funs.entries().values() {
            for c in bdd.coclauses() {
                for fc in c.leaf.coclauses() {
                    self.tick()?;
                    if !function::coclause_is_empty(self, &fc.pos, &fc.neg)? {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }
}
