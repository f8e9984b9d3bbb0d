//! Concurrency behaviour of the in-process lock service.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dispatch_core::{LockService, MemoryLockService};

#[test]
fn exactly_one_thread_wins_a_contended_key() {
    let service = Arc::new(MemoryLockService::default());
    let outcomes: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| service.try_acquire("solve:1:1", None).is_some()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });
    assert_eq!(outcomes.iter().filter(|won| **won).count(), 1);
}

#[test]
fn a_released_key_is_reacquirable_from_another_thread() {
    let service = Arc::new(MemoryLockService::default());
    let token = service.try_acquire("solve:2:2", Some(Duration::from_secs(60))).unwrap();
    service.release(token);

    let reacquired = thread::scope(|scope| {
        scope
            .spawn(|| service.try_acquire("solve:2:2", None).is_some())
            .join()
            .unwrap()
    });
    assert!(reacquired);
}
