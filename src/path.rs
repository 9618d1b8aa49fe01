//! Path helpers for command lines.
//!
//! Paths are handled as text and accept both `/` and `\` as separators,
//! since plugin scripts mix the two. Only [`create_directory_tree`],
//! [`directory_exists`] and [`file_exists`] touch the filesystem.

use crate::error::Result;

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};
use std::time::SystemTime;

/// Part of a file path selected by [`file_name_part`].
///
/// Each variant shows the part it selects from `C:\User\Docs\name.ext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileNamePart {
    /// `C`
    Drive,
    /// `C:\User\Docs\`
    DirPath,
    /// `name.ext`
    NameExt,
    /// `name`
    Name,
    /// `.ext`
    Ext,
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Returns the drive letter if `path` starts with `X:`.
fn drive_letter(path: &str) -> Option<char> {
    let mut chars = path.chars();

    match (chars.next(), chars.next()) {
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => Some(letter),
        _ => None,
    }
}

/// Returns `true` for an absolute path.
///
/// Besides what the host considers absolute, UNC paths (`\\server\share`)
/// and drive-rooted paths (`C:\dir`) count as full paths on every platform.
pub fn is_full_path(path: &str) -> bool {
    if path.starts_with("\\\\") || path.starts_with("//") {
        return true;
    }

    if drive_letter(path).is_some() && path[2..].starts_with(is_separator) {
        return true;
    }

    Path::new(path).is_absolute()
}

/// Splits `path` into its root (empty when relative) and the remainder.
///
/// The returned flag tells whether the root is absolute, so that `..`
/// components can never climb above it.
fn split_root(path: &str) -> (String, &str, bool) {
    if path.starts_with("\\\\") || path.starts_with("//") {
        return (format!("{MAIN_SEPARATOR}{MAIN_SEPARATOR}"), &path[2..], true);
    }

    if let Some(letter) = drive_letter(path) {
        let rest = &path[2..];

        return match rest.strip_prefix(is_separator) {
            Some(rest) => (format!("{letter}:{MAIN_SEPARATOR}"), rest, true),
            None => (format!("{letter}:"), rest, false),
        };
    }

    match path.strip_prefix(is_separator) {
        Some(rest) => (MAIN_SEPARATOR.to_string(), rest, true),
        None => (String::new(), path, false),
    }
}

/// Lexically normalizes `path`.
///
/// Removes `.` components and redundant separators, resolves `..` against
/// the preceding component and uses the host separator throughout. Leading
/// `..` components of a relative path are kept. The filesystem is never
/// consulted, so symbolic links are not resolved.
pub fn normalize_path(path: &str) -> String {
    let (root, rest, absolute) = split_root(path);
    let mut parts: Vec<&str> = Vec::new();

    for part in rest.split(is_separator) {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    let joined = parts.join(MAIN_SEPARATOR_STR);

    if root.is_empty() && joined.is_empty() {
        return ".".to_string();
    }

    root + &joined
}

/// Extracts one part of a file path.
///
/// A leading dot belongs to the name (`.profile` has no extension).
/// Missing parts are returned as empty strings.
pub fn file_name_part(path: &str, part: FileNamePart) -> String {
    let drive = drive_letter(path);

    let mut split = path.rfind(is_separator).map_or(0, |i| i + 1);
    if drive.is_some() {
        split = split.max(2);
    }

    let (dir, name_ext) = path.split_at(split);

    let ext_start = match name_ext.rfind('.') {
        Some(0) | None => name_ext.len(),
        Some(i) => i,
    };
    let (name, ext) = name_ext.split_at(ext_start);

    match part {
        FileNamePart::Drive => drive.map(String::from).unwrap_or_default(),
        FileNamePart::DirPath => dir.to_string(),
        FileNamePart::NameExt => name_ext.to_string(),
        FileNamePart::Name => name.to_string(),
        FileNamePart::Ext => ext.to_string(),
    }
}

/// Creates a directory and all of its missing parents.
///
/// Succeeds if the directory already exists.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if:
/// - the path is empty,
/// - a component exists but is not a directory,
/// - a directory cannot be created.
pub fn create_directory_tree(path: impl AsRef<Path>) -> Result<()> {
    let target = path.as_ref();

    if target.as_os_str().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty path").into());
    }

    let mut acc = PathBuf::new();

    for component in target.components() {
        acc.push(component.as_os_str());

        if let Component::Normal(_) = component {
            match fs::create_dir(&acc) {
                Ok(()) => tracing::trace!(path = %acc.display(), "directory created"),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && acc.is_dir() => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

/// Returns `true` if `path` names an existing directory.
pub fn directory_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}

/// Returns `true` if `path` names an existing regular file.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Bytes inspected by [`is_valid_text_file`].
const TEXT_SNIFF_LEN: u64 = 8 * 1024;

/// Returns `true` if `path` is a readable regular file that looks like text.
///
/// A file starting with a UTF-16 byte order mark is text. Otherwise the
/// leading block must not contain a nul byte. Empty files are text.
pub fn is_valid_text_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if !path.is_file() {
        return false;
    }

    let mut head = Vec::new();
    let read = File::open(path).and_then(|file| file.take(TEXT_SNIFF_LEN).read_to_end(&mut head));

    if let Err(e) = read {
        tracing::debug!(path = %path.display(), error = %e, "cannot read file");
        return false;
    }

    head.starts_with(&[0xFF, 0xFE]) || head.starts_with(&[0xFE, 0xFF]) || !head.contains(&0)
}

/// Returns the last modification time of `path`.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the metadata cannot be read.
pub fn file_write_time(path: impl AsRef<Path>) -> Result<SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}

/// Sets the last modification time of the file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the file cannot be opened
/// for writing or the time cannot be applied.
pub fn set_file_write_time(path: impl AsRef<Path>, time: SystemTime) -> Result<()> {
    let file = File::options().write(true).open(path)?;
    file.set_modified(time)?;

    Ok(())
}
