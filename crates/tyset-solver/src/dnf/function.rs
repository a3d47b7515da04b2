//! The function constructor.
//!
//! Function DNFs are partitioned by arity like tuples. Emptiness of a
//! coclause `⋀ pos ∧ ⋀ ¬neg` is the semantic subtyping decomposition of
//! arrows: positives alone are always inhabited (the function that accepts
//! nothing is in every arrow type), so only a negative arrow whose domain is
//! covered by the positive domains and whose codomain survives the recursive
//! `explore` walk can witness emptiness.

use crate::bdd::Bdd;
use crate::constraints::ConstraintSets;
use crate::emptiness::EmptyCtx;
use crate::normalize::NormCtx;
use crate::types::{EngineError, TypeId};

/// A function atom `(D₁, …, Dₙ) → C`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FnAtom {
    pub domains: Vec<TypeId>,
    pub codomain: TypeId,
}

impl FnAtom {
    pub fn arity(&self) -> usize {
        self.domains.len()
    }
}

pub type FnDnf = Bdd<FnAtom, bool>;

/// The domain tuple of an arrow, as an interned type.
fn domain_tuple(ctx_store: &crate::intern::TypeStore, atom: &FnAtom) -> TypeId {
    ctx_store.tuple(atom.domains.clone())
}

/// Emptiness of `⋀ pos ∧ ⋀ ¬neg` for arrows of one arity.
pub(crate) fn coclause_is_empty(
    ctx: &mut EmptyCtx<'_>,
    pos: &[FnAtom],
    neg: &[FnAtom],
) -> Result<bool, EngineError> {
    if neg.is_empty() {
        return Ok(false);
    }
    let big_s = ctx
        .store
        .union_all(pos.iter().map(|p| domain_tuple(ctx.store, p)));
    for n in neg {
        ctx.tick()?;
        let dn = domain_tuple(ctx.store, n);
        if ctx.is_empty(ctx.store.diff(dn, big_s))? {
            let t2 = ctx.store.negate(n.codomain);
            if explore(ctx, dn, t2, pos)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// `explore(Ts, T2, P)` decides whether every function in `⋀ P` maps the
/// argument slice `Ts` into `¬T2`; the two recursive branches split `P`'s
/// head arrow into "argument inside its domain" and "argument outside".
fn explore(
    ctx: &mut EmptyCtx<'_>,
    ts: TypeId,
    t2: TypeId,
    pos: &[FnAtom],
) -> Result<bool, EngineError> {
    if ctx.is_empty(ts)? || ctx.is_empty(t2)? {
        return Ok(true);
    }
    let Some((p, rest)) = pos.split_first() else {
        return Ok(false);
    };
    ctx.tick()?;
    let narrowed = ctx.store.intersect(t2, p.codomain);
    if !explore(ctx, ts, narrowed, rest)? {
        return Ok(false);
    }
    let dp = domain_tuple(ctx.store, p);
    let outside = ctx.store.diff(ts, dp);
    explore(ctx, outside, t2, rest)
}

/// Constraint generation mirroring [`coclause_is_empty`]: per negative, the
/// domain-coverage part and the return-constraint part must both hold
/// (meet); the negatives are alternatives (join).
pub(crate) fn coclause_normalize(
    ctx: &mut NormCtx<'_>,
    pos: &[FnAtom],
    neg: &[FnAtom],
) -> Result<ConstraintSets, EngineError> {
    if neg.is_empty() {
        return Ok(ConstraintSets::none());
    }
    let big_s = ctx
        .store
        .union_all(pos.iter().map(|p| domain_tuple(ctx.store, p)));
    let mut acc = ConstraintSets::none();
    for n in neg {
        if acc.is_trivially_satisfied() {
            return Ok(acc);
        }
        ctx.tick()?;
        let dn = domain_tuple(ctx.store, n);
        let not_covered = ctx.store.diff(dn, big_s);
        let t2 = ctx.store.negate(n.codomain);
        let covered = ctx.normalize(not_covered)?;
        let per_neg = ctx.meet2(covered, |c| explore_normalize(c, dn, t2, pos))?;
        acc = acc.join(per_neg);
    }
    Ok(acc)
}

/// Constraint generation mirroring [`explore`].
fn explore_normalize(
    ctx: &mut NormCtx<'_>,
    ts: TypeId,
    t2: TypeId,
    pos: &[FnAtom],
) -> Result<ConstraintSets, EngineError> {
    ctx.tick()?;
    let mut acc = ctx.normalize(ts)?;
    if !acc.is_trivially_satisfied() {
        acc = acc.join(ctx.normalize(t2)?);
    }
    let Some((p, rest)) = pos.split_first() else {
        return Ok(acc);
    };
    if acc.is_trivially_satisfied() {
        return Ok(acc);
    }
    let narrowed = ctx.store.intersect(t2, p.codomain);
    let inside = explore_normalize(ctx, ts, narrowed, rest)?;
    let both = ctx.meet2(inside, |c| {
        let dp = domain_tuple(c.store, p);
        let outside = c.store.diff(ts, dp);
        explore_normalize(c, outside, t2, rest)
    })?;
    Ok(acc.join(both))
}
