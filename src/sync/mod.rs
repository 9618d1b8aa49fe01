//! Blocking synchronization primitives for OS threads.
//!
//! The current primitives include:
//! - [`ExclusiveLock`]: a reentrant mutual exclusion lock,
//! - [`LockGuard`]: scoped acquisition of an [`ExclusiveLock`],
//! - [`WaitableEvent`]: a manual- or auto-reset signal with timed waits.
//!
//! ## Design notes
//!
//! - The primitives guard critical sections, not values. The state they
//!   protect lives elsewhere and is the caller's to identify.
//! - Each primitive exclusively owns its native object. There is no
//!   process-wide registry of locks or events.
//! - Failures are returned to the immediate caller; nothing is retried.

mod event;
mod lock;

pub use crate::sys::NativeEvent;
pub use event::{EventOptions, INFINITE, Timeout, WaitResult, WaitableEvent};
pub use lock::{ExclusiveLock, LockGuard};
