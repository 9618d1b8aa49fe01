//! Thread creation.
//!
//! Spawned threads run concurrently with their creator with no implicit
//! synchronization. Start and completion signals, and protection of shared
//! data, are set up by the caller with the primitives in [`crate::sync`].
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use vinculum::thread::create_new_thread;
//!
//! let ran = Arc::new(AtomicBool::new(false));
//! let handle = create_new_thread(|ran: Arc<AtomicBool>| ran.store(true, Ordering::Release), ran.clone())
//!     .unwrap();
//!
//! handle.join().unwrap();
//! assert!(ran.load(Ordering::Acquire));
//! ```

mod builder;
mod handle;

pub use builder::Spawner;
pub use handle::ThreadHandle;

use crate::error::Result;

/// Starts a new thread running `entry(parameter)`.
///
/// Dropping the returned handle detaches the thread.
///
/// # Errors
///
/// Returns [`Error::Spawn`](crate::Error::Spawn) if the OS cannot create
/// the thread. The entry function never runs in that case.
pub fn create_new_thread<P, F>(entry: F, parameter: P) -> Result<ThreadHandle>
where
    F: FnOnce(P) + Send + 'static,
    P: Send + 'static,
{
    Spawner::new().spawn(entry, parameter)
}
