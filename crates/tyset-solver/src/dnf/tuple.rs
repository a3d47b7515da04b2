//! The tuple constructor.
//!
//! Tuple DNFs are partitioned by arity (arity is part of the atom identity),
//! so every coclause the engines see carries atoms of a single arity. The
//! componentwise walk here is shared with the record constructor, whose
//! fields behave exactly like tuple components once the tags agree.

use crate::bdd::Bdd;
use crate::constraints::ConstraintSets;
use crate::emptiness::EmptyCtx;
use crate::normalize::NormCtx;
use crate::types::{EngineError, TypeId};

/// A tuple atom `(T₁, …, Tₙ)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TupleAtom {
    pub elems: Vec<TypeId>,
}

impl TupleAtom {
    pub fn arity(&self) -> usize {
        self.elems.len()
    }
}

pub type TupleDnf = Bdd<TupleAtom, bool>;

/// Emptiness of `⋀ pos ∧ ⋀ ¬neg` for tuples of the given arity.
pub(crate) fn coclause_is_empty(
    ctx: &mut EmptyCtx<'_>,
    arity: usize,
    pos: &[TupleAtom],
    neg: &[TupleAtom],
) -> Result<bool, EngineError> {
    let mut s = vec![TypeId::ANY; arity];
    for p in pos {
        debug_assert_eq!(p.arity(), arity);
        for (i, &e) in p.elems.iter().enumerate() {
            s[i] = ctx.store.intersect(s[i], e);
        }
    }
    components_is_empty(ctx, s, neg)
}

/// The recursive projection walk: `(S₁,…,Sₙ) \ ⋃ neg` is empty iff some
/// component is empty, or for the first negative every `i`-slice
/// `(S₁,…,Sᵢ ∧ ¬Dᵢ,…,Sₙ)` is empty under the remaining negatives.
pub(crate) fn components_is_empty(
    ctx: &mut EmptyCtx<'_>,
    s: Vec<TypeId>,
    negs: &[TupleAtom],
) -> Result<bool, EngineError> {
    ctx.tick()?;
    for &si in &s {
        if ctx.is_empty(si)? {
            return Ok(true);
        }
    }
    let Some((d, rest)) = negs.split_first() else {
        return Ok(false);
    };
    for i in 0..s.len() {
        let mut slice = s.clone();
        slice[i] = ctx.store.diff(s[i], d.elems[i]);
        if !components_is_empty(ctx, slice, rest)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Constraint generation mirroring [`coclause_is_empty`].
pub(crate) fn coclause_normalize(
    ctx: &mut NormCtx<'_>,
    arity: usize,
    pos: &[TupleAtom],
    neg: &[TupleAtom],
) -> Result<ConstraintSets, EngineError> {
    let mut s = vec![TypeId::ANY; arity];
    for p in pos {
        debug_assert_eq!(p.arity(), arity);
        for (i, &e) in p.elems.iter().enumerate() {
            s[i] = ctx.store.intersect(s[i], e);
        }
    }
    components_normalize(ctx, s, neg)
}

/// Constraint generation mirroring [`components_is_empty`]: emptiness of a
/// component is an alternative (join), the slices of a negative must all be
/// emptied together (meet).
pub(crate) fn components_normalize(
    ctx: &mut NormCtx<'_>,
    s: Vec<TypeId>,
    negs: &[TupleAtom],
) -> Result<ConstraintSets, EngineError> {
    ctx.tick()?;
    let mut acc = ConstraintSets::none();
    for &si in &s {
        if acc.is_trivially_satisfied() {
            return Ok(acc);
        }
        acc = acc.join(ctx.normalize(si)?);
    }
    let Some((d, rest)) = negs.split_first() else {
        return Ok(acc);
    };
    if acc.is_trivially_satisfied() {
        return Ok(acc);
    }
    let mut all = ConstraintSets::unit();
    for i in 0..s.len() {
        if all.is_none() {
            break;
        }
        let mut slice = s.clone();
        slice[i] = ctx.store.diff(s[i], d.elems[i]);
        all = ctx.meet2(all, |c| components_normalize(c, slice, rest))?;
    }
    Ok(acc.join(all))
}
