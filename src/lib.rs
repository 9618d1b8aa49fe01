//! # Vinculum
//!
//! **Vinculum** is a small synchronization toolkit for plugins that hand
//! work to OS threads and need to coordinate access to shared state.
//!
//! It provides:
//!
//! - A **reentrant exclusive lock** whose owner thread may re-acquire it
//! - A **scoped lock guard** releasing the lock on every exit path
//! - A **waitable event** with manual or automatic reset and timed waits
//! - A **thread spawner** running an entry function with one parameter
//!
//! Alongside the primitives live the text and path helpers used when
//! building and parsing shell-like command lines.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use vinculum::sync::{EventOptions, ExclusiveLock, LockGuard, Timeout, WaitableEvent};
//! use vinculum::thread::create_new_thread;
//!
//! let lock = Arc::new(ExclusiveLock::new());
//! let ready = Arc::new(WaitableEvent::with_options(EventOptions::new()).unwrap());
//!
//! let worker = create_new_thread(
//!     |(lock, ready): (Arc<ExclusiveLock>, Arc<WaitableEvent>)| {
//!         ready.wait(Timeout::Infinite);
//!         let _guard = LockGuard::new(&lock);
//!         // critical section
//!     },
//!     (lock.clone(), ready.clone()),
//! )
//! .unwrap();
//!
//! ready.set().unwrap();
//! worker.join().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`sync`]: lock, guard and event primitives
//! - [`thread`]: thread creation
//! - [`text`]: quoting, escaping and case helpers
//! - [`path`]: path splitting, normalization and directory creation
//! - [`env`]: environment variables and the working directory
//!
//! ## Logging
//!
//! Diagnostics are emitted through [`tracing`]. The crate never installs
//! a subscriber; applications choose where the events go.

mod error;
mod sys;

pub mod env;
pub mod path;
pub mod sync;
pub mod text;
pub mod thread;

pub use error::{Error, Result};
