//! Atomic file writing for compiled and merged output.
//!
//! Contents go to a temporary file next to the target and are renamed into
//! place, so readers never observe a partially written file.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A bundle name made safe to embed in a single file name.
///
/// Anything other than ASCII alphanumerics, `-`, `_` and `.` becomes `_`, so
/// path separators can never move output out of its directory.
pub fn file_stem(name: &str) -> Cow<'_, str> {
    let keep = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if name.chars().all(keep) {
        return Cow::Borrowed(name);
    }
    Cow::Owned(name.chars().map(|c| if keep(c) { c } else { '_' }).collect())
}

/// Write `contents` to `path` unless the file already holds exactly those
/// bytes. Returns whether the file was written.
///
/// Parent directories are created as needed.
pub fn write_if_changed(path: &Path, contents: &[u8]) -> Result<bool> {
    if path.is_file() && fs::read(path)? == contents {
        return Ok(false);
    }

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(dir).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.persist(path).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to move '{}' into place: {}",
            path.display(),
            e.error
        ))
    })?;

    Ok(true)
}
