use std::io;

/// Errors reported by the synchronization primitives and helpers.
///
/// Timeouts are deliberately absent: an elapsed wait is a normal
/// [`WaitResult::TimedOut`](crate::sync::WaitResult::TimedOut) outcome.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The OS refused to create a native lock or event object.
    #[error("native object creation failed: {0}")]
    Os(#[source] io::Error),

    /// The OS refused to create a new thread.
    #[error("thread creation failed: {0}")]
    Spawn(#[source] io::Error),

    /// The event has no native handle (never created, or already destroyed).
    #[error("event handle is null")]
    NullEvent,

    /// The requested feature is not available on this platform.
    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),

    /// The joined thread's entry function panicked.
    #[error("thread panicked before completing")]
    ThreadPanicked,

    /// A filesystem helper failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
