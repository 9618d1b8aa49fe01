//! Windows platform layer.
//!
//! Critical sections are natively reentrant for the owning thread, and
//! Win32 event objects provide manual/auto reset and timed waits directly.

use crate::error::{Error, Result};
use crate::sync::WaitResult;

use std::cell::UnsafeCell;
use std::ffi::OsStr;
use std::io;
use std::mem;
use std::os::windows::ffi::OsStrExt;
use std::ptr;
use std::time::Duration;

use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, WAIT_OBJECT_0, WAIT_TIMEOUT};
use windows_sys::Win32::System::Threading::{
    CRITICAL_SECTION, CreateEventW, DeleteCriticalSection, EnterCriticalSection, INFINITE,
    InitializeCriticalSection, LeaveCriticalSection, ResetEvent, SetEvent, WaitForSingleObject,
};

/// A Win32 critical section.
///
/// Boxed because a critical section must not move once initialized.
pub(crate) struct RawMutex {
    inner: Box<UnsafeCell<CRITICAL_SECTION>>,
}

// Safety: critical sections are designed to be shared between threads.
unsafe impl Send for RawMutex {}
unsafe impl Sync for RawMutex {}

impl RawMutex {
    /// Creates and initializes a critical section.
    ///
    /// `InitializeCriticalSection` cannot fail on supported versions of Windows.
    pub(crate) fn new() -> io::Result<Self> {
        let inner: Box<UnsafeCell<CRITICAL_SECTION>> =
            Box::new(UnsafeCell::new(unsafe { mem::zeroed() }));

        unsafe { InitializeCriticalSection(inner.get()) };

        Ok(Self { inner })
    }

    pub(crate) fn lock(&self) {
        unsafe { EnterCriticalSection(self.inner.get()) };
    }

    /// # Safety
    ///
    /// The calling thread must own the critical section.
    pub(crate) unsafe fn unlock(&self) {
        unsafe { LeaveCriticalSection(self.inner.get()) };
    }
}

impl Drop for RawMutex {
    fn drop(&mut self) {
        unsafe { DeleteCriticalSection(self.inner.get()) };
    }
}

/// Native event object backing a [`WaitableEvent`](crate::sync::WaitableEvent).
///
/// Owns one Win32 event `HANDLE`, closed on drop.
pub struct NativeEvent {
    handle: HANDLE,
    manual_reset: bool,
}

// Safety: kernel object handles may be used from any thread.
unsafe impl Send for NativeEvent {}
unsafe impl Sync for NativeEvent {}

impl NativeEvent {
    /// Creates a new event with `CreateEventW`.
    ///
    /// A named event opens the existing kernel object if another process
    /// already created it under the same name.
    pub(crate) fn new(manual_reset: bool, initial_state: bool, name: Option<&str>) -> Result<Self> {
        let wide: Option<Vec<u16>> = name.map(|n| {
            OsStr::new(n)
                .encode_wide()
                .chain(std::iter::once(0))
                .collect()
        });

        let name_ptr = wide.as_ref().map_or(ptr::null(), |w| w.as_ptr());

        let handle = unsafe {
            CreateEventW(
                ptr::null(),
                i32::from(manual_reset),
                i32::from(initial_state),
                name_ptr,
            )
        };

        if handle.is_null() {
            return Err(Error::Os(io::Error::last_os_error()));
        }

        Ok(Self {
            handle,
            manual_reset,
        })
    }

    /// Returns `true` for a manual-reset event.
    pub fn is_manual_reset(&self) -> bool {
        self.manual_reset
    }

    /// Returns the underlying Win32 handle.
    ///
    /// The handle stays owned by this event.
    pub fn as_raw_handle(&self) -> HANDLE {
        self.handle
    }

    pub(crate) fn set(&self) -> Result<()> {
        if unsafe { SetEvent(self.handle) } == 0 {
            return Err(Error::Os(io::Error::last_os_error()));
        }

        Ok(())
    }

    pub(crate) fn reset(&self) -> Result<()> {
        if unsafe { ResetEvent(self.handle) } == 0 {
            return Err(Error::Os(io::Error::last_os_error()));
        }

        Ok(())
    }

    /// Waits with `WaitForSingleObject`, `None` meaning `INFINITE`.
    ///
    /// Finite timeouts are rounded up to whole milliseconds, so a
    /// non-zero timeout never degrades into a poll.
    pub(crate) fn wait(&self, timeout: Option<Duration>) -> WaitResult {
        let millis = match timeout {
            None => INFINITE,
            Some(duration) => u32::try_from(duration.as_nanos().div_ceil(1_000_000))
                .unwrap_or(INFINITE - 1)
                .min(INFINITE - 1),
        };

        match unsafe { WaitForSingleObject(self.handle, millis) } {
            WAIT_OBJECT_0 => WaitResult::Signaled,
            WAIT_TIMEOUT => WaitResult::TimedOut,
            _ => WaitResult::Failed,
        }
    }
}

impl Drop for NativeEvent {
    fn drop(&mut self) {
        unsafe { CloseHandle(self.handle) };
    }
}
