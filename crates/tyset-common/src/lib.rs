//! Common types and utilities for the tyset type engine.
//!
//! This crate provides the foundational pieces shared by the engine crates:
//! - String interning (`Symbol`, `Interner`)
//! - Centralized limits and thresholds

// String interning for atom and variable names
pub mod interner;
pub use interner::{Interner, Symbol};

// Centralized limits and thresholds
pub mod limits;
