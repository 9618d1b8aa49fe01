//! Two workers gated by one auto-reset event, counting under a shared lock.

use vinculum::sync::{EventOptions, ExclusiveLock, LockGuard, Timeout, WaitResult, WaitableEvent};
use vinculum::thread::create_new_thread;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

struct Job {
    start: WaitableEvent,
    lock: ExclusiveLock,
    counter: AtomicUsize,
}

impl Job {
    fn count(&self) -> usize {
        let _guard = LockGuard::new(&self.lock);
        self.counter.load(Ordering::Relaxed)
    }

    /// Polls the counter until it reaches `expected` or `within` elapses.
    fn wait_for_count(&self, expected: usize, within: Duration) -> bool {
        let start = Instant::now();

        while start.elapsed() < within {
            if self.count() == expected {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }

        self.count() == expected
    }
}

fn worker(job: Arc<Job>) {
    if job.start.wait(Timeout::Infinite) != WaitResult::Signaled {
        return;
    }

    let _guard = LockGuard::new(&job.lock);
    let value = job.counter.load(Ordering::Relaxed);
    job.counter.store(value + 1, Ordering::Relaxed);
}

#[test]
fn test_auto_reset_event_releases_workers_one_at_a_time() {
    let mut start = WaitableEvent::new();
    start
        .create(EventOptions::new().manual_reset(false).initial_state(false))
        .unwrap();

    let job = Arc::new(Job {
        start,
        lock: ExclusiveLock::new(),
        counter: AtomicUsize::new(0),
    });

    let b = create_new_thread(worker, job.clone()).unwrap();
    let c = create_new_thread(worker, job.clone()).unwrap();

    thread::sleep(Duration::from_millis(50));
    assert_eq!(job.count(), 0, "workers must wait for the start signal");

    job.start.set().unwrap();
    assert!(job.wait_for_count(1, Duration::from_secs(5)));

    // The other worker stays blocked on the consumed signal.
    thread::sleep(Duration::from_millis(150));
    assert_eq!(job.count(), 1);
    assert!(b.is_finished() ^ c.is_finished());

    job.start.set().unwrap();
    assert!(job.wait_for_count(2, Duration::from_secs(5)));

    b.join().unwrap();
    c.join().unwrap();
}
