//! Platform-specific native primitives.
//!
//! The lock needs a mutex the owning thread can re-enter, and the event
//! needs a signal with manual or automatic reset and a timed wait.
//!
//! The concrete implementation is selected at compile time
//! depending on the target operating system:
//! - unix: recursive `pthread_mutex_t`, flag + condition variable events,
//! - windows: `CRITICAL_SECTION` and Win32 event objects.

#[cfg(unix)]
pub(crate) mod unix;

#[cfg(windows)]
pub(crate) mod windows;

#[cfg(unix)]
pub(crate) use unix as platform;

#[cfg(windows)]
pub(crate) use windows as platform;

pub(crate) use platform::RawMutex;
pub use platform::NativeEvent;
