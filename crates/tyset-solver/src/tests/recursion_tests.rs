//! Recursion guard budgets and profiles.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};

#[test]
fn profile_limits() {
    assert_eq!(RecursionProfile::Emptiness.max_depth(), 512);
    assert_eq!(RecursionProfile::Emptiness.max_iterations(), 1_000_000);
    assert_eq!(RecursionProfile::Tallying.max_iterations(), 4_000_000);
    let custom = RecursionProfile::Custom {
        max_depth: 7,
        max_iterations: 42,
    };
    assert_eq!(custom.max_depth(), 7);
    assert_eq!(custom.max_iterations(), 42);
}

#[test]
fn with_profile_constructor() {
    let guard = RecursionGuard::<u32>::with_profile(RecursionProfile::Emptiness);
    assert_eq!(guard.max_depth(), 512);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_exceeded());
    assert!(!guard.is_active());
}

#[test]
fn basic_enter_leave() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.depth(), 1);
    assert!(guard.is_visiting(&1));
    assert!(guard.is_active());
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_visiting(&1));
    assert!(!guard.is_active());
}

#[test]
fn cycle_detection() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.enter(1u32), RecursionResult::CycleDetected);
    guard.leave(1);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
}

#[test]
fn depth_limit() {
    let mut guard = RecursionGuard::new(2, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.enter(2u32), RecursionResult::Entered);
    assert_eq!(guard.enter(3u32), RecursionResult::DepthLimit);
    assert!(guard.is_exceeded());
}

#[test]
fn iteration_limit_via_ticks() {
    let mut guard = RecursionGuard::<u32>::new(10, 3);
    assert!(guard.tick());
    assert!(guard.tick());
    assert!(guard.tick());
    assert!(!guard.tick());
    assert!(guard.is_exceeded());
}

#[test]
fn enter_spends_iterations() {
    let mut guard = RecursionGuard::new(10, 2);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.enter(2u32), RecursionResult::Entered);
    assert_eq!(guard.enter(3u32), RecursionResult::IterationLimit);
}

#[test]
fn visiting_count_tracks_stack() {
    let mut guard = RecursionGuard::new(10, 100);
    guard.enter(1u32);
    guard.enter(2u32);
    assert_eq!(guard.visiting_count(), 2);
    guard.leave(2);
    assert_eq!(guard.visiting_count(), 1);
    guard.leave(1);
    assert_eq!(guard.visiting_count(), 0);
}
