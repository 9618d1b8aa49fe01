use crate::error::{Error, Result};
use crate::sys::RawMutex;

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A reentrant mutual-exclusion lock.
///
/// `ExclusiveLock` guards a critical section rather than a value: it is
/// used to protect state that lives elsewhere (a job queue, a plugin
/// setting) across OS threads.
///
/// The thread that owns the lock may lock it again without deadlocking;
/// each [`lock`](Self::lock) must then be balanced by one
/// [`unlock`](Self::unlock). Prefer [`LockGuard`] which balances the
/// calls automatically.
///
/// The native object can be transferred to another instance with
/// [`take`](Self::take). The source is then *invalid*: locking and
/// unlocking it do nothing and dropping it releases nothing.
///
/// A native mutex that is still held when the lock is dropped (a
/// forgotten guard, a missing unlock) is leaked rather than destroyed.
///
/// # Examples
///
/// ```rust
/// use vinculum::sync::{ExclusiveLock, LockGuard};
///
/// let lock = ExclusiveLock::new();
/// {
///     let _outer = LockGuard::new(&lock);
///     let _inner = LockGuard::new(&lock); // same thread, no deadlock
/// }
/// ```
pub struct ExclusiveLock {
    /// Native reentrant mutex, `None` once transferred away.
    raw: Option<RawMutex>,

    /// Outstanding `lock` calls across all threads.
    holds: AtomicUsize,
}

impl ExclusiveLock {
    /// Creates a new unlocked lock.
    ///
    /// Native creation is not expected to fail. If the OS refuses anyway,
    /// the error is logged and the returned lock is invalid. Use
    /// [`try_new`](Self::try_new) to observe the failure.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(lock) => lock,
            Err(e) => {
                tracing::error!(error = %e, "failed to create native lock, lock is inert");
                Self::from_raw(None)
            }
        }
    }

    /// Creates a new unlocked lock, reporting native creation failures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Os`] if the OS cannot create the mutex.
    pub fn try_new() -> Result<Self> {
        let raw = RawMutex::new().map_err(Error::Os)?;
        tracing::trace!("native lock created");

        Ok(Self::from_raw(Some(raw)))
    }

    fn from_raw(raw: Option<RawMutex>) -> Self {
        Self {
            raw,
            holds: AtomicUsize::new(0),
        }
    }

    /// Returns `true` while this instance owns a native object.
    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    /// Blocks the calling thread until it owns the lock.
    ///
    /// Returns immediately if the calling thread already owns it.
    /// Does nothing on an invalid lock.
    pub fn lock(&self) {
        if let Some(raw) = &self.raw {
            raw.lock();
            self.holds.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Releases one level of ownership.
    ///
    /// Does nothing on an invalid lock.
    ///
    /// # Safety
    ///
    /// The calling thread must own the lock, through a previous call to
    /// [`lock`](Self::lock) that has not been balanced yet. An unbalanced
    /// unlock is not detected.
    pub unsafe fn unlock(&self) {
        if let Some(raw) = &self.raw {
            // Only the owner reaches this point, so the count is non-zero
            // unless the caller broke the contract.
            let _ = self
                .holds
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
            unsafe { raw.unlock() };
        }
    }

    /// Acquires the lock for the lifetime of the returned guard.
    pub fn guard(&self) -> LockGuard<'_> {
        LockGuard::new(self)
    }

    /// Moves the native object out into a new lock.
    ///
    /// `self` becomes invalid. Assigning the result over another lock
    /// (`dst = src.take()`) drops the destination's previous native object.
    ///
    /// The lock should not be held when it is taken. If it is, the holds
    /// move along with the native object and the new lock must be
    /// unlocked as many times.
    pub fn take(&mut self) -> ExclusiveLock {
        let raw = self.raw.take();
        let holds = mem::take(self.holds.get_mut());
        tracing::debug!(transferred = raw.is_some(), holds, "lock ownership taken");

        ExclusiveLock {
            raw,
            holds: AtomicUsize::new(holds),
        }
    }
}

impl Default for ExclusiveLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ExclusiveLock {
    fn drop(&mut self) {
        let Some(raw) = self.raw.take() else {
            return;
        };

        let holds = *self.holds.get_mut();
        if holds > 0 {
            // Destroying a held mutex is undefined, so it is leaked.
            tracing::warn!(holds, "lock dropped while held, leaking native lock");
            mem::forget(raw);
        } else {
            tracing::trace!("native lock destroyed");
        }
    }
}

impl fmt::Debug for ExclusiveLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusiveLock")
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// Scoped acquisition of an [`ExclusiveLock`].
///
/// Locks on construction and unlocks when dropped, on every exit path:
/// normal return, early return, `?` propagation or unwinding.
///
/// The guard cannot be cloned and cannot leave the thread that created
/// it, since the unlock must happen on the owning thread.
#[must_use = "if unused the lock is released immediately"]
pub struct LockGuard<'a> {
    lock: &'a ExclusiveLock,

    /// Keeps the guard `!Send`.
    _not_send: PhantomData<*const ()>,
}

impl<'a> LockGuard<'a> {
    /// Blocks until `lock` is owned by the calling thread.
    pub fn new(lock: &'a ExclusiveLock) -> Self {
        lock.lock();

        Self {
            lock,
            _not_send: PhantomData,
        }
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        // Safety: paired with the `lock` in `new`, on the same thread.
        unsafe { self.lock.unlock() };
    }
}
