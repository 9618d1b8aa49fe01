//! Process environment helpers.

use crate::error::Result;

use std::env;
use std::path::PathBuf;

/// Returns the value of the environment variable `name`.
///
/// An unset variable, or one whose value is not valid Unicode, yields an
/// empty string.
pub fn environment_var(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

/// Returns the current working directory of the process.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the directory was removed
/// or cannot be read.
pub fn current_dir() -> Result<PathBuf> {
    Ok(env::current_dir()?)
}
