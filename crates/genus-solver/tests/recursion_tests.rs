use super::*;

#[test]
fn test_enter_and_leave() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::Traversal);

    assert!(guard.enter(1).is_entered());
    assert_eq!(guard.depth(), 1);
    assert!(guard.is_visiting(&1));

    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_visiting(&1));
}

#[test]
fn test_cycle_detection() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::Traversal);

    assert!(guard.enter(7).is_entered());
    assert!(guard.enter(7).is_cycle());
    // A cycle is not a limit violation.
    assert!(!guard.is_exceeded());
    guard.leave(7);
}

#[test]
fn test_depth_limit() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(3, 1000);

    assert!(guard.enter(0).is_entered());
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert!(guard.enter(3).is_exceeded());
    assert!(guard.is_exceeded());
}

#[test]
fn test_iteration_limit() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 5);

    for i in 0..5 {
        assert!(guard.enter(i).is_entered());
        guard.leave(i);
    }
    assert!(guard.enter(99).is_exceeded());
}

#[test]
fn test_scope_helper() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::Traversal);

    let result = guard.scope(1, |g| {
        assert!(g.is_visiting(&1));
        42
    });
    assert_eq!(result, Ok(42));
    assert!(!guard.is_visiting(&1));

    guard.enter(2);
    let denied = guard.scope(2, |_| 0);
    assert_eq!(denied, Err(RecursionResult::Cycle));
}
