//! Set-theoretic type engine.
//!
//! Types are Boolean combinations (unions, intersections, negations) of
//! atomic constructors (atoms, integers, bitstrings, tuples, functions,
//! records, maps), represented as per-constructor binary decision diagrams
//! inside interned, possibly recursive type records. The engine answers the
//! three queries that drive a type checker:
//!
//! - **emptiness** of a type ([`SubtypeChecker::is_empty`]), which is also
//!   the whole subtype relation (`a ≤ b ⟺ a ∧ ¬b = ∅`);
//! - **subtyping** ([`SubtypeChecker::is_subtype_of`]);
//! - **tallying** ([`tally`]): solving a system of subtype constraints for
//!   substitution candidates over flexible type variables.
//!
//! The engine is a pure function library: no I/O, no persisted state. The
//! only shared structure is the [`TypeStore`], which is safe to use from
//! several threads; query memo tables are per call.

pub mod bdd;
pub mod constraints;
mod display;
pub mod dnf;
pub mod emptiness;
pub mod intern;
pub mod normalize;
pub mod recursion;
pub mod substitute;
pub mod ty;
pub mod types;

pub use constraints::{ConstraintSet, ConstraintSets, VarBounds};
pub use emptiness::SubtypeChecker;
pub use intern::TypeStore;
pub use normalize::{normalize, tally};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use substitute::{Substitution, free_variables, substitute};
pub use ty::TyRec;
pub use types::{EngineError, QueryOpts, TypeId, TypeVar};
pub use tyset_common::Symbol;

#[cfg(test)]
mod tests;
