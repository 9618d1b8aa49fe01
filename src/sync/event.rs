use crate::error::{Error, Result};
use crate::sys::NativeEvent;

use std::fmt;
use std::time::Duration;

/// Millisecond timeout value meaning "wait forever".
pub const INFINITE: u32 = u32::MAX;

/// How long [`WaitableEvent::wait`] may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Block until the event is signaled.
    Infinite,

    /// Block at most this long. `Duration::ZERO` polls.
    After(Duration),
}

impl Timeout {
    /// Does not block at all.
    pub const POLL: Timeout = Timeout::After(Duration::ZERO);

    /// Converts a millisecond count, [`INFINITE`] mapping to [`Timeout::Infinite`].
    pub const fn from_millis(millis: u32) -> Self {
        if millis == INFINITE {
            Timeout::Infinite
        } else {
            Timeout::After(Duration::from_millis(millis as u64))
        }
    }

    fn as_duration(self) -> Option<Duration> {
        match self {
            Timeout::Infinite => None,
            Timeout::After(duration) => Some(duration),
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Timeout::After(duration)
    }
}

impl From<u32> for Timeout {
    fn from(millis: u32) -> Self {
        Timeout::from_millis(millis)
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(Timeout::Infinite, Timeout::After)
    }
}

/// Outcome of [`WaitableEvent::wait`].
///
/// An elapsed timeout is an ordinary outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    /// The event was signaled.
    Signaled,

    /// The timeout elapsed before the event was signaled.
    TimedOut,

    /// The wait could not be performed (for instance on a null event).
    Failed,
}

/// Creation parameters for a [`WaitableEvent`].
///
/// Defaults to an unnamed, auto-reset, initially unsignaled event.
///
/// # Examples
///
/// ```rust
/// use vinculum::sync::{EventOptions, WaitableEvent};
///
/// let mut event = WaitableEvent::new();
/// event
///     .create(EventOptions::new().manual_reset(true).initial_state(true))
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventOptions {
    manual_reset: bool,
    initial_state: bool,
    name: Option<String>,
}

impl EventOptions {
    /// Creates options for an unnamed, auto-reset, unsignaled event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects manual reset (`true`) or auto reset (`false`).
    pub fn manual_reset(mut self, manual_reset: bool) -> Self {
        self.manual_reset = manual_reset;
        self
    }

    /// Sets whether the event starts signaled.
    pub fn initial_state(mut self, signaled: bool) -> Self {
        self.initial_state = signaled;
        self
    }

    /// Gives the event a system-visible name, shared across processes.
    ///
    /// Only supported on windows; creation fails with
    /// [`Error::Unsupported`] elsewhere.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A manual- or auto-reset signal that threads can wait on.
///
/// A `WaitableEvent` starts *null*: it owns no native handle until
/// [`create`](Self::create) is called. Every operation on a null event
/// reports failure without blocking.
///
/// Creation and destruction need `&mut self`; signaling and waiting only
/// need `&self`, so an event is created first and then shared (usually
/// through an `Arc`).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use vinculum::sync::{EventOptions, Timeout, WaitResult, WaitableEvent};
///
/// let event = Arc::new(WaitableEvent::with_options(EventOptions::new()).unwrap());
///
/// let waiter = {
///     let event = event.clone();
///     std::thread::spawn(move || event.wait(Timeout::Infinite))
/// };
///
/// event.set().unwrap();
/// assert_eq!(waiter.join().unwrap(), WaitResult::Signaled);
/// ```
#[derive(Default)]
pub struct WaitableEvent {
    native: Option<NativeEvent>,
}

impl WaitableEvent {
    /// Creates a null event.
    pub fn new() -> Self {
        Self { native: None }
    }

    /// Creates an event and immediately creates its native handle.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn with_options(options: EventOptions) -> Result<Self> {
        let mut event = Self::new();
        event.create(options)?;
        Ok(event)
    }

    /// Creates the native handle, destroying any existing one first.
    ///
    /// # Errors
    ///
    /// - [`Error::Os`] if the OS refuses to create the event,
    /// - [`Error::Unsupported`] for a named event on a platform without
    ///   named events.
    ///
    /// On error the event is left null.
    pub fn create(&mut self, options: EventOptions) -> Result<&NativeEvent> {
        self.native = None;

        let name = options.name.as_deref();
        let native = NativeEvent::new(options.manual_reset, options.initial_state, name)
            .inspect_err(|e| tracing::warn!(error = %e, name, "event creation failed"))?;

        tracing::trace!(
            manual_reset = options.manual_reset,
            initial_state = options.initial_state,
            name,
            "event created"
        );

        Ok(&*self.native.insert(native))
    }

    /// Releases the native handle, returning the event to the null state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullEvent`] if there was no handle to release.
    pub fn destroy(&mut self) -> Result<()> {
        match self.native.take() {
            Some(_) => {
                tracing::trace!("event destroyed");
                Ok(())
            }
            None => Err(null_event("destroy")),
        }
    }

    /// Signals the event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullEvent`] on a null event, or [`Error::Os`] if the
    /// native call fails.
    pub fn set(&self) -> Result<()> {
        let native = self.native.as_ref().ok_or_else(|| null_event("set"))?;
        tracing::trace!("event set");
        native.set()
    }

    /// Clears the signaled state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullEvent`] on a null event, or [`Error::Os`] if the
    /// native call fails.
    pub fn reset(&self) -> Result<()> {
        let native = self.native.as_ref().ok_or_else(|| null_event("reset"))?;
        tracing::trace!("event reset");
        native.reset()
    }

    /// Blocks until the event is signaled or `timeout` elapses.
    ///
    /// On an auto-reset event a [`WaitResult::Signaled`] outcome consumes
    /// the signal, so exactly one waiter proceeds per [`set`](Self::set).
    /// A manual-reset event releases every waiter until it is reset.
    ///
    /// Returns [`WaitResult::Failed`] immediately on a null event.
    pub fn wait(&self, timeout: impl Into<Timeout>) -> WaitResult {
        match &self.native {
            Some(native) => native.wait(timeout.into().as_duration()),
            None => {
                tracing::warn!("wait on a null event");
                WaitResult::Failed
            }
        }
    }

    /// Returns `true` if the event owns no native handle.
    pub fn is_null(&self) -> bool {
        self.native.is_none()
    }

    /// Returns the native handle, if any.
    pub fn handle(&self) -> Option<&NativeEvent> {
        self.native.as_ref()
    }
}

impl fmt::Debug for WaitableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitableEvent")
            .field("null", &self.is_null())
            .field(
                "manual_reset",
                &self.native.as_ref().map(NativeEvent::is_manual_reset),
            )
            .finish()
    }
}

/// Logs and builds the error for an operation on a null event.
fn null_event(operation: &'static str) -> Error {
    tracing::warn!(operation, "operation on a null event");
    Error::NullEvent
}
