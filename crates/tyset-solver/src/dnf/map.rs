//! The map constructor.
//!
//! A map atom `#{K => V}` denotes the maps all of whose associations lie in
//! `K × V`; the empty map inhabits every map atom. Positive atoms intersect
//! componentwise (an intersection of products is a product). A coclause with
//! negatives is empty iff only the empty map survives the positives (some
//! component of the product is empty, and every negative contains the empty
//! map) or a single negative covers the whole positive product. Several
//! negatives are not combined; that approximation never claims emptiness
//! wrongly.

use crate::bdd::Bdd;
use crate::constraints::ConstraintSets;
use crate::emptiness::EmptyCtx;
use crate::normalize::NormCtx;
use crate::types::{EngineError, TypeId};

/// A map atom `#{K => V}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapAtom {
    pub key: TypeId,
    pub value: TypeId,
}

pub type MapDnf = Bdd<MapAtom, bool>;

pub(crate) fn coclause_is_empty(
    ctx: &mut EmptyCtx<'_>,
    pos: &[MapAtom],
    neg: &[MapAtom],
) -> Result<bool, EngineError> {
    if neg.is_empty() {
        return Ok(false);
    }
    let mut key = TypeId::ANY;
    let mut value = TypeId::ANY;
    for p in pos {
        key = ctx.store.intersect(key, p.key);
        value = ctx.store.intersect(value, p.value);
    }
    if ctx.is_empty(key)? || ctx.is_empty(value)? {
        return Ok(true);
    }
    for n in neg {
        ctx.tick()?;
        if ctx.is_subtype(key, n.key)? && ctx.is_subtype(value, n.value)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn coclause_normalize(
    ctx: &mut NormCtx<'_>,
    pos: &[MapAtom],
    neg: &[MapAtom],
) -> Result<ConstraintSets, EngineError> {
    if neg.is_empty() {
        return Ok(ConstraintSets::none());
    }
    let mut key = TypeId::ANY;
    let mut value = TypeId::ANY;
    for p in pos {
        key = ctx.store.intersect(key, p.key);
        value = ctx.store.intersect(value, p.value);
    }
    // Degenerate product (only the empty map left) as one alternative…
    let mut acc = ctx.normalize(key)?;
    if !acc.is_trivially_satisfied() {
        acc = acc.join(ctx.normalize(value)?);
    }
    // …or some single negative covering the product.
    for n in neg {
        if acc.is_trivially_satisfied() {
            return Ok(acc);
        }
        ctx.tick()?;
        let key_uncovered = ctx.store.diff(key, n.key);
        let value_uncovered = ctx.store.diff(value, n.value);
        let key_part = ctx.normalize(key_uncovered)?;
        let per_neg = ctx.meet2(key_part, |c| c.normalize(value_uncovered))?;
        acc = acc.join(per_neg);
    }
    Ok(acc)
}
