use crate::error::{Error, Result};

use std::fmt;
use std::thread::{JoinHandle, Thread, ThreadId};

/// A handle to a thread started by [`Spawner`](super::Spawner).
///
/// Dropping the handle does **not** stop the thread; it only discards
/// the ability to join it.
pub struct ThreadHandle {
    inner: JoinHandle<()>,
}

impl ThreadHandle {
    pub(crate) fn new(inner: JoinHandle<()>) -> Self {
        Self { inner }
    }

    /// Blocks until the thread has finished.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThreadPanicked`] if the entry function panicked.
    pub fn join(self) -> Result<()> {
        let id = self.id();

        match self.inner.join() {
            Ok(()) => {
                tracing::debug!(?id, "thread joined");
                Ok(())
            }
            Err(_) => {
                tracing::debug!(?id, "joined thread had panicked");
                Err(Error::ThreadPanicked)
            }
        }
    }

    /// Returns `true` once the entry function has returned or panicked.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Returns the underlying thread.
    pub fn thread(&self) -> &Thread {
        self.inner.thread()
    }

    /// Returns the identifier of the underlying thread.
    pub fn id(&self) -> ThreadId {
        self.inner.thread().id()
    }
}

impl fmt::Debug for ThreadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadHandle")
            .field("id", &self.id())
            .field("name", &self.thread().name())
            .field("finished", &self.is_finished())
            .finish()
    }
}
