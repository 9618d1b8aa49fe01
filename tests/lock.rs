use vinculum::sync::{ExclusiveLock, LockGuard};

use proptest::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

const BLOCKED: Duration = Duration::from_millis(100);
const RELEASED: Duration = Duration::from_secs(5);

/// Tries to take `lock` from another thread.
///
/// The returned receiver yields once the other thread got the lock.
fn acquire_elsewhere(lock: &Arc<ExclusiveLock>) -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel();
    let lock = lock.clone();

    thread::spawn(move || {
        let _guard = LockGuard::new(&lock);
        let _ = tx.send(());
    });

    rx
}

#[test]
fn test_nested_lock_same_thread() {
    let lock = ExclusiveLock::new();
    assert!(lock.is_valid());

    lock.lock();
    lock.lock();
    lock.lock();

    unsafe {
        lock.unlock();
        lock.unlock();
        lock.unlock();
    }
}

#[test]
fn test_nested_guards_same_thread() {
    let lock = ExclusiveLock::new();

    let _a = LockGuard::new(&lock);
    let _b = lock.guard();
    let _c = LockGuard::new(&lock);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_balanced_nesting_never_deadlocks(depth in 1usize..64) {
        let lock = Arc::new(ExclusiveLock::new());

        for _ in 0..depth {
            lock.lock();
        }
        for _ in 0..depth {
            unsafe { lock.unlock() };
        }

        let rx = acquire_elsewhere(&lock);
        prop_assert!(rx.recv_timeout(RELEASED).is_ok());
    }
}

#[test]
fn test_reentrant_hold_needs_matching_unlocks() {
    let lock = Arc::new(ExclusiveLock::new());

    lock.lock();
    lock.lock();

    let rx = acquire_elsewhere(&lock);

    unsafe { lock.unlock() };
    assert!(
        rx.recv_timeout(BLOCKED).is_err(),
        "one unlock of two must keep the lock held"
    );

    unsafe { lock.unlock() };
    assert!(rx.recv_timeout(RELEASED).is_ok());
}

#[test]
fn test_mutual_exclusion_stress() {
    const THREADS: usize = 8;
    const INCREMENTS: usize = 2_000;

    let lock = Arc::new(ExclusiveLock::new());

    // Read-modify-write as two separate steps: updates are only kept
    // if the lock really serializes the threads.
    let counter = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let lock = lock.clone();
            let counter = counter.clone();

            thread::spawn(move || {
                for _ in 0..INCREMENTS {
                    let _guard = LockGuard::new(&lock);
                    let value = counter.load(Ordering::Relaxed);
                    thread::yield_now();
                    counter.store(value + 1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counter.load(Ordering::Relaxed), THREADS * INCREMENTS);
}

#[test]
fn test_guard_releases_on_early_return() {
    fn first_even(lock: &ExclusiveLock, values: &[u32]) -> Option<u32> {
        let _guard = LockGuard::new(lock);

        for &v in values {
            if v % 2 == 0 {
                return Some(v);
            }
        }

        None
    }

    let lock = Arc::new(ExclusiveLock::new());
    assert_eq!(first_even(&lock, &[1, 3, 4, 5]), Some(4));

    let rx = acquire_elsewhere(&lock);
    assert!(rx.recv_timeout(RELEASED).is_ok());
}

#[test]
fn test_guard_releases_on_propagated_error() {
    fn parse_locked(lock: &ExclusiveLock, text: &str) -> Result<u32, std::num::ParseIntError> {
        let _guard = LockGuard::new(lock);
        let value = text.parse::<u32>()?;
        Ok(value * 2)
    }

    let lock = Arc::new(ExclusiveLock::new());
    assert!(parse_locked(&lock, "not a number").is_err());

    let rx = acquire_elsewhere(&lock);
    assert!(rx.recv_timeout(RELEASED).is_ok());
}

#[test]
fn test_guard_releases_on_panic() {
    let lock = Arc::new(ExclusiveLock::new());

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard = LockGuard::new(&lock);
        panic!("boom inside critical section");
    }));
    assert!(result.is_err());

    let rx = acquire_elsewhere(&lock);
    assert!(rx.recv_timeout(RELEASED).is_ok());
}

#[test]
fn test_take_transfers_native_lock() {
    let mut source = ExclusiveLock::new();
    let target = Arc::new(source.take());

    assert!(!source.is_valid());
    assert!(target.is_valid());

    // An invalid lock ignores every operation.
    source.lock();
    source.lock();
    unsafe { source.unlock() };
    drop(source);

    let guard = LockGuard::new(&target);
    let rx = acquire_elsewhere(&target);
    assert!(
        rx.recv_timeout(BLOCKED).is_err(),
        "transferred lock must still exclude other threads"
    );

    drop(guard);
    assert!(rx.recv_timeout(RELEASED).is_ok());
}

#[test]
fn test_take_twice_yields_invalid_lock() {
    let mut source = ExclusiveLock::new();
    let first = source.take();
    let second = source.take();

    assert!(first.is_valid());
    assert!(!second.is_valid());
    assert!(!source.is_valid());
}

#[test]
fn test_take_assigned_over_existing_lock() {
    let mut source = ExclusiveLock::new();
    let mut target = ExclusiveLock::new();
    assert!(target.is_valid());

    target = source.take();

    assert!(target.is_valid());
    assert!(!source.is_valid());

    let _guard = target.guard();
}

#[test]
fn test_native_move_keeps_lock_usable() {
    let lock = ExclusiveLock::new();
    lock.lock();

    let moved = lock;
    moved.lock();
    unsafe {
        moved.unlock();
        moved.unlock();
    }

    let boxed = Arc::new(moved);
    let rx = acquire_elsewhere(&boxed);
    assert!(rx.recv_timeout(RELEASED).is_ok());
}

#[test]
fn test_default_and_debug() {
    let mut lock = ExclusiveLock::default();
    assert!(lock.is_valid());
    assert_eq!(format!("{lock:?}"), "ExclusiveLock { valid: true }");

    let _ = lock.take();
    assert_eq!(format!("{lock:?}"), "ExclusiveLock { valid: false }");
}

#[test]
fn test_drop_while_locked_is_safe() {
    let lock = ExclusiveLock::new();
    lock.lock();
    lock.lock();
    drop(lock);

    // The process keeps working with fresh locks afterwards.
    let other = Arc::new(ExclusiveLock::new());
    let rx = acquire_elsewhere(&other);
    assert!(rx.recv_timeout(RELEASED).is_ok());
}

#[test]
fn test_drop_after_forgotten_guard_is_safe() {
    let lock = ExclusiveLock::new();
    std::mem::forget(lock.guard());
    drop(lock);
}

#[test]
fn test_take_held_lock_moves_holds() {
    let mut source = ExclusiveLock::new();
    source.lock();

    let target = Arc::new(source.take());
    drop(source);

    let rx = acquire_elsewhere(&target);
    assert!(
        rx.recv_timeout(BLOCKED).is_err(),
        "hold taken along with the native lock"
    );

    unsafe { target.unlock() };
    assert!(rx.recv_timeout(RELEASED).is_ok());
}
