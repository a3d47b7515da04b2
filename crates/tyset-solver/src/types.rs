//! Core identifier and error types for the type engine.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use serde::Serialize;

use crate::recursion::RecursionProfile;

// =============================================================================
// Type Reference
// =============================================================================

/// Opaque handle for a canonical type in the [`TypeStore`](crate::TypeStore).
///
/// Two references obtained from `intern` are equal iff they denote
/// structurally equal canonical type records. References created through
/// `fresh_recursive` identify their recursive group and never compare equal
/// to independently built copies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The empty type. Pre-registered by every store.
    pub const EMPTY: TypeId = TypeId(0);

    /// The top type. Pre-registered by every store.
    pub const ANY: TypeId = TypeId(1);
}

// =============================================================================
// Type Variable
// =============================================================================

/// An interned type variable.
///
/// Whether a variable is flexible (may be constrained by tallying) or fixed
/// (a rigid skolem) is not a property of the variable itself; it is decided
/// per query by the `fixed` set handed to [`tally`](crate::tally).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TypeVar(pub u32);

// =============================================================================
// Errors
// =============================================================================

/// Caller-recoverable failures of the decision procedures.
///
/// These are resource bounds, not wrong answers: the caller may retry with a
/// larger budget or conservatively treat the query as "not empty" / "no
/// constraint". Structural misuse of the engine (a dangling reference, an
/// undefined reserved id) is a panic, never an `EngineError`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The recursion depth budget was exhausted.
    DepthLimit { depth: u32 },
    /// The per-query operation budget was exhausted.
    FuelExhausted,
    /// The caller's cancellation flag was raised.
    Cancelled,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::DepthLimit { depth } => {
                write!(f, "type query exceeded recursion depth limit ({depth})")
            }
            EngineError::FuelExhausted => write!(f, "type query exceeded operation budget"),
            EngineError::Cancelled => write!(f, "type query cancelled"),
        }
    }
}

impl std::error::Error for EngineError {}

// =============================================================================
// Query Options
// =============================================================================

/// Per-query configuration: recursion budgets and an optional cancellation
/// flag polled at coclause boundaries.
#[derive(Clone, Debug, Default)]
pub struct QueryOpts {
    pub profile: RecursionProfile,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl QueryOpts {
    pub fn with_profile(profile: RecursionProfile) -> Self {
        QueryOpts {
            profile,
            cancel: None,
        }
    }
}
