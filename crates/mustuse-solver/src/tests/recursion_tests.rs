use super::*;

#[test]
fn test_enter_leave_tracks_depth() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.depth(), 2);
    assert!(guard.is_visiting(&1));
    guard.leave(2);
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_visiting(&1));
}

#[test]
fn test_reentering_same_key_is_a_cycle() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
    assert!(guard.enter(7).is_entered());
    let second = guard.enter(7);
    assert!(second.is_cycle());
    assert!(!second.is_exceeded());
    assert!(!guard.is_exceeded());
    guard.leave(7);
}

#[test]
fn test_depth_limit() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(2, 100);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
    assert!(guard.is_exceeded());
    guard.leave(2);
    guard.leave(1);
}

#[test]
fn test_iteration_budget() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 3);
    for key in 0..3 {
        assert!(guard.enter(key).is_entered());
        guard.leave(key);
    }
    assert_eq!(guard.enter(99), RecursionResult::IterationExceeded);
    assert_eq!(guard.iterations(), 4);
}

#[test]
fn test_profiles() {
    assert_eq!(RecursionProfile::PropertyLookup.max_depth(), 50);
    assert_eq!(RecursionProfile::TypeLowering.max_depth(), 100);
    let custom = RecursionProfile::Custom {
        max_depth: 3,
        max_iterations: 9,
    };
    assert_eq!(custom.max_depth(), 3);
    assert_eq!(custom.max_iterations(), 9);
}
