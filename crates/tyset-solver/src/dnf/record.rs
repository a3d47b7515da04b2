//! The record constructor.
//!
//! Records are tagged field rows: a record atom carries its tag symbol and
//! its field types, and two atoms with different tags (or field counts)
//! denote disjoint sets of values. Within one tag the fields behave exactly
//! like tuple components, so the walks delegate to the tuple module.

use tyset_common::Symbol;

use crate::bdd::Bdd;
use crate::constraints::ConstraintSets;
use crate::dnf::tuple::{self, TupleAtom};
use crate::emptiness::EmptyCtx;
use crate::normalize::NormCtx;
use crate::types::{EngineError, TypeId};

/// A record atom `#name{F₁, …, Fₙ}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordAtom {
    pub name: Symbol,
    pub fields: Vec<TypeId>,
}

impl RecordAtom {
    fn tag(&self) -> (Symbol, usize) {
        (self.name, self.fields.len())
    }
}

pub type RecordDnf = Bdd<RecordAtom, bool>;

pub(crate) fn coclause_is_empty(
    ctx: &mut EmptyCtx<'_>,
    pos: &[RecordAtom],
    neg: &[RecordAtom],
) -> Result<bool, EngineError> {
    // No positive tag: the coclause keeps records of every tag not excluded,
    // and finitely many negatives cannot cover infinitely many tags.
    let Some((first, rest_pos)) = pos.split_first() else {
        return Ok(false);
    };
    let tag = first.tag();
    if rest_pos.iter().any(|p| p.tag() != tag) {
        return Ok(true);
    }
    let mut fields = first.fields.clone();
    for p in rest_pos {
        for (i, &f) in p.fields.iter().enumerate() {
            fields[i] = ctx.store.intersect(fields[i], f);
        }
    }
    let negs: Vec<TupleAtom> = neg
        .iter()
        .filter(|n| n.tag() == tag)
        .map(|n| TupleAtom {
            elems: n.fields.clone(),
        })
        .collect();
    tuple::components_is_empty(ctx, fields, &negs)
}

pub(crate) fn coclause_normalize(
    ctx: &mut NormCtx<'_>,
    pos: &[RecordAtom],
    neg: &[RecordAtom],
) -> Result<ConstraintSets, EngineError> {
    let Some((first, rest_pos)) = pos.split_first() else {
        return Ok(ConstraintSets::none());
    };
    let tag = first.tag();
    if rest_pos.iter().any(|p| p.tag() != tag) {
        // Distinct tags are disjoint: the coclause is already empty.
        return Ok(ConstraintSets::unit());
    }
    let mut fields = first.fields.clone();
    for p in rest_pos {
        for (i, &f) in p.fields.iter().enumerate() {
            fields[i] = ctx.store.intersect(fields[i], f);
        }
    }
    let negs: Vec<TupleAtom> = neg
        .iter()
        .filter(|n| n.tag() == tag)
        .map(|n| TupleAtom {
            elems: n.fields.clone(),
        })
        .collect();
    tuple::components_normalize(ctx, fields, &negs)
}
