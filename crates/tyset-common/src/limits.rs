//! Centralized limits and thresholds for the type engine.
//!
//! This module provides shared constants for recursion depths, operation
//! counts and stack management used throughout the engine. Centralizing the
//! values keeps the solver profiles (`tyset_solver::recursion`) the single
//! source of truth for per-query budgets while the raw numbers live here.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum recursion depth for emptiness and subtype queries.
///
/// Emptiness recurses through constructor atoms (tuple components, function
/// domains and codomains), so the depth tracks the nesting depth of the types
/// involved, not their size. Recursive types terminate through the memo
/// table; this limit is a backstop for pathological non-recursive nesting.
pub const MAX_EMPTINESS_DEPTH: u32 = 512;

/// Maximum recursion depth for constraint normalization.
///
/// Normalization follows the same recursion structure as emptiness but builds
/// constraint sets on the way out, so it gets the same depth budget.
pub const MAX_NORMALIZE_DEPTH: u32 = 512;

/// Maximum recursion depth for variable substitution.
pub const MAX_SUBSTITUTE_DEPTH: u32 = 512;

// =============================================================================
// Operation Count Limits
// =============================================================================

/// Fuel for a single emptiness or subtype query, spent one unit per DNF
/// coclause visited. Exhaustion surfaces as a caller-recoverable error, never
/// as a wrong answer.
pub const MAX_EMPTINESS_FUEL: u64 = 1_000_000;

/// Fuel for a single tallying query. Tallying expands the emptiness walk into
/// constraint generation, so it gets a larger budget.
pub const MAX_NORMALIZE_FUEL: u64 = 4_000_000;

/// Fuel for a single substitution query.
pub const MAX_SUBSTITUTE_FUEL: u64 = 1_000_000;

/// Bound on the residue search when deciding emptiness of bitstring length
/// sets. The search space is the combined period of the length progressions
/// in a coclause; beyond this bound the query reports fuel exhaustion.
pub const MAX_BITSTRING_PERIOD: u128 = 1 << 20;

// =============================================================================
// Stack Management
// =============================================================================

/// Remaining stack (bytes) below which the recursive engines grow the stack.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size (bytes) of each newly allocated stack segment.
pub const STACK_GROWTH: usize = 4 * 1024 * 1024;
