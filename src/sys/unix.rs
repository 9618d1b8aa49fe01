//! Unix platform layer.
//!
//! The lock is a `pthread_mutex_t` configured as `PTHREAD_MUTEX_RECURSIVE`,
//! so the owning thread may re-enter it. POSIX has no event object; events
//! are signal bookkeeping guarded by a mutex and paired with a condition variable.

use crate::error::{Error, Result};
use crate::sync::WaitResult;

use libc::{
    PTHREAD_MUTEX_INITIALIZER, PTHREAD_MUTEX_RECURSIVE, c_int, pthread_mutex_destroy,
    pthread_mutex_init, pthread_mutex_lock, pthread_mutex_t, pthread_mutex_unlock,
    pthread_mutexattr_destroy, pthread_mutexattr_init, pthread_mutexattr_settype,
    pthread_mutexattr_t,
};
use std::cell::UnsafeCell;
use std::io;
use std::mem;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Converts a pthread return code into an `io::Result`.
///
/// pthread functions report failures through their return value
/// rather than `errno`.
fn cvt(rc: c_int) -> io::Result<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::from_raw_os_error(rc))
    }
}

/// A recursive pthread mutex.
///
/// The mutex lives in its own heap allocation: a pthread mutex must never
/// change address once initialized, while the owning Rust value may move.
pub(crate) struct RawMutex {
    inner: Box<UnsafeCell<pthread_mutex_t>>,
}

// Safety: pthread mutexes are designed to be shared between threads.
unsafe impl Send for RawMutex {}
unsafe impl Sync for RawMutex {}

impl RawMutex {
    /// Creates and initializes a recursive mutex.
    pub(crate) fn new() -> io::Result<Self> {
        let inner = Box::new(UnsafeCell::new(PTHREAD_MUTEX_INITIALIZER));

        unsafe {
            let mut attr: pthread_mutexattr_t = mem::zeroed();
            cvt(pthread_mutexattr_init(&mut attr))?;

            let rc = match cvt(pthread_mutexattr_settype(&mut attr, PTHREAD_MUTEX_RECURSIVE)) {
                Ok(()) => cvt(pthread_mutex_init(inner.get(), &attr)),
                Err(e) => Err(e),
            };

            pthread_mutexattr_destroy(&mut attr);
            rc?;
        }

        Ok(Self { inner })
    }

    /// Blocks until the calling thread owns the mutex.
    pub(crate) fn lock(&self) {
        let rc = unsafe { pthread_mutex_lock(self.inner.get()) };
        debug_assert_eq!(rc, 0, "pthread_mutex_lock failed");
    }

    /// Releases one level of ownership.
    ///
    /// # Safety
    ///
    /// The calling thread must own the mutex.
    pub(crate) unsafe fn unlock(&self) {
        unsafe { pthread_mutex_unlock(self.inner.get()) };
    }
}

impl Drop for RawMutex {
    fn drop(&mut self) {
        unsafe { pthread_mutex_destroy(self.inner.get()) };
    }
}

/// Signal bookkeeping of a [`NativeEvent`], guarded by its mutex.
#[derive(Default)]
struct EventState {
    /// Signal not yet handed to any waiter.
    signaled: bool,

    /// Auto-reset: threads currently blocked in `wait`.
    waiters: usize,

    /// Auto-reset: signals handed to blocked waiters, one per `set`.
    permits: usize,

    /// Manual-reset: bumped by every `set`, so waiters blocked at that
    /// moment are released even if `reset` follows immediately.
    generation: u64,
}

/// Native event object backing a [`WaitableEvent`](crate::sync::WaitableEvent).
///
/// On unix this is signal bookkeeping plus a condition variable. An
/// auto-reset `set` releases exactly one blocked waiter per call; a
/// manual-reset `set` releases every thread blocked at that moment.
pub struct NativeEvent {
    state: Mutex<EventState>,

    /// Wakes threads blocked in [`wait`](Self::wait).
    condvar: Condvar,

    /// Manual-reset events stay signaled until explicitly reset.
    manual_reset: bool,
}

impl NativeEvent {
    /// Creates a new event.
    ///
    /// Named events are shared across processes on windows; there is no
    /// unix counterpart, so a name is rejected.
    pub(crate) fn new(manual_reset: bool, initial_state: bool, name: Option<&str>) -> Result<Self> {
        if name.is_some() {
            return Err(Error::Unsupported("named events"));
        }

        Ok(Self {
            state: Mutex::new(EventState {
                signaled: initial_state,
                ..EventState::default()
            }),
            condvar: Condvar::new(),
            manual_reset,
        })
    }

    /// Returns `true` for a manual-reset event.
    pub fn is_manual_reset(&self) -> bool {
        self.manual_reset
    }

    /// Locks the event state.
    ///
    /// Every update leaves the counters consistent before anything can
    /// panic, so a poisoned mutex is recovered instead of propagated.
    fn state(&self) -> MutexGuard<'_, EventState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set(&self) -> Result<()> {
        let mut state = self.state();

        if self.manual_reset {
            state.signaled = true;
            state.generation = state.generation.wrapping_add(1);
            self.condvar.notify_all();
        } else if state.waiters > state.permits {
            state.permits += 1;
            self.condvar.notify_one();
        } else {
            state.signaled = true;
        }

        Ok(())
    }

    pub(crate) fn reset(&self) -> Result<()> {
        self.state().signaled = false;
        Ok(())
    }

    /// Waits for the event, `None` meaning no deadline.
    pub(crate) fn wait(&self, timeout: Option<Duration>) -> WaitResult {
        let state = self.state();

        if self.manual_reset {
            self.wait_manual(state, timeout)
        } else {
            self.wait_auto(state, timeout)
        }
    }

    /// Returns once the flag is set or a `set` happened while blocked.
    fn wait_manual(&self, state: MutexGuard<'_, EventState>, timeout: Option<Duration>) -> WaitResult {
        if state.signaled {
            return WaitResult::Signaled;
        }

        let generation = state.generation;
        let pending = |s: &mut EventState| !s.signaled && s.generation == generation;

        match timeout {
            None => {
                let _state = self
                    .condvar
                    .wait_while(state, pending)
                    .unwrap_or_else(PoisonError::into_inner);
                WaitResult::Signaled
            }

            Some(duration) => {
                let (_state, result) = self
                    .condvar
                    .wait_timeout_while(state, duration, pending)
                    .unwrap_or_else(PoisonError::into_inner);

                if result.timed_out() {
                    WaitResult::TimedOut
                } else {
                    WaitResult::Signaled
                }
            }
        }
    }

    /// Consumes the flag, or blocks until a `set` hands this thread a permit.
    ///
    /// `set` only raises the flag when every blocked waiter already holds
    /// a permit, so each call releases exactly one thread.
    fn wait_auto(&self, mut state: MutexGuard<'_, EventState>, timeout: Option<Duration>) -> WaitResult {
        if state.signaled {
            state.signaled = false;
            return WaitResult::Signaled;
        }

        if timeout == Some(Duration::ZERO) {
            return WaitResult::TimedOut;
        }

        state.waiters += 1;
        let no_permit = |s: &mut EventState| s.permits == 0;

        let mut state = match timeout {
            None => self
                .condvar
                .wait_while(state, no_permit)
                .unwrap_or_else(PoisonError::into_inner),

            Some(duration) => {
                self.condvar
                    .wait_timeout_while(state, duration, no_permit)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
        };

        state.waiters -= 1;

        // A permit handed out while the timeout elapsed still belongs to us.
        if state.permits > 0 {
            state.permits -= 1;
            WaitResult::Signaled
        } else {
            WaitResult::TimedOut
        }
    }
}
