use super::ThreadHandle;
use crate::error::{Error, Result};

use std::io;
use std::thread;

/// Builder for configuring and starting a thread.
///
/// `Spawner` allows customizing the new thread before starting it.
/// Currently, it supports a thread name and a stack size.
///
/// # Examples
///
/// ```rust
/// use vinculum::thread::Spawner;
///
/// let handle = Spawner::new()
///     .name("job-runner")
///     .stack_size(256 * 1024)
///     .spawn(|n: u32| assert_eq!(n, 7), 7)
///     .unwrap();
///
/// handle.join().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    /// Name given to the thread, visible in panic messages and debuggers.
    name: Option<String>,

    /// Stack size in bytes, platform default when unset.
    stack_size: Option<usize>,
}

impl Spawner {
    /// Creates a `Spawner` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the thread.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stack size of the thread, in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Starts a thread running `entry(parameter)`.
    ///
    /// # Arguments
    ///
    /// * `entry` - Entry function, invoked exactly once on the new thread
    /// * `parameter` - Value moved into the new thread and handed to `entry`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the name contains a nul byte or the OS
    /// cannot create the thread, in which case `entry` never runs.
    pub fn spawn<P, F>(self, entry: F, parameter: P) -> Result<ThreadHandle>
    where
        F: FnOnce(P) + Send + 'static,
        P: Send + 'static,
    {
        let mut builder = thread::Builder::new();

        if let Some(name) = self.name.clone() {
            if name.contains('\0') {
                tracing::warn!(?name, "thread name contains a nul byte");
                return Err(Error::Spawn(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "thread name contains a nul byte",
                )));
            }

            builder = builder.name(name);
        }

        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        let handle = builder
            .spawn(move || entry(parameter))
            .map_err(|e| {
                tracing::warn!(error = %e, name = ?self.name, "thread creation failed");
                Error::Spawn(e)
            })?;

        tracing::trace!(id = ?handle.thread().id(), name = ?self.name, "thread started");

        Ok(ThreadHandle::new(handle))
    }
}
