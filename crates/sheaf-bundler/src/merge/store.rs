//! The directory of merged files.
//!
//! Files are content-addressed by [`content_key`], so a file that already
//! exists under its name is reused as is. New files are written to a
//! temporary file in the same directory and renamed into place, which keeps
//! concurrent writers of the same group from corrupting each other.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use sheaf_graph::kind::join_link;
use sheaf_graph::{MimeKind, Resource};
use tracing::{debug, info};

use super::key::{content_key, merged_file_name};
use crate::output::write_if_changed;
use crate::{Error, Result};

/// What [`MergedFileStore::ensure`] did for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file already existed; nothing was merged.
    Reused,
    /// The merged bytes were written.
    Written,
    /// The file appeared while merging and already held the same bytes.
    Unchanged,
}

/// Counters over the lifetime of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub reused: usize,
    pub written: usize,
    pub unchanged: usize,
}

#[derive(Debug)]
pub struct MergedFileStore {
    dir: PathBuf,
    public_path: String,
    stats: Mutex<StoreStats>,
}

impl MergedFileStore {
    /// Create a store writing to `dir`, linked under `public_path`.
    ///
    /// The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_path: public_path.into(),
            stats: Mutex::new(StoreStats::default()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    pub fn stats(&self) -> StoreStats {
        *self.stats.lock()
    }

    /// Make sure the merged file for `files` exists and return it as a
    /// resource.
    ///
    /// `merge` is only called when the file is not already present.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMimeKind`] if `mime` has no merged extension
    /// - any error returned by `merge`
    /// - [`Error::Io`] / [`Error::WriteFailure`] if the file cannot be written
    pub fn ensure<F>(
        &self,
        group: &str,
        mime: &MimeKind,
        files: &[PathBuf],
        merge: F,
    ) -> Result<(Resource, WriteOutcome)>
    where
        F: FnOnce(&[PathBuf]) -> sheaf_graph::Result<Vec<u8>>,
    {
        let extension = mime
            .merged_extension()
            .ok_or_else(|| Error::UnsupportedMimeKind(mime.clone()))?;
        let key = content_key(files);
        let file_name = merged_file_name(group, &key, extension);
        let path = self.dir.join(&file_name);

        let outcome = if path.is_file() {
            debug!(group, file = %path.display(), "reusing merged file");
            WriteOutcome::Reused
        } else {
            let contents = merge(files)?;
            self.write(&path, &contents)?
        };

        self.record(outcome);

        let resource = Resource::new(mime.clone(), path, join_link(&self.public_path, &file_name));
        Ok((resource, outcome))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<WriteOutcome> {
        if write_if_changed(path, contents)? {
            info!(file = %path.display(), bytes = contents.len(), "wrote merged file");
            Ok(WriteOutcome::Written)
        } else {
            debug!(file = %path.display(), "merged file unchanged");
            Ok(WriteOutcome::Unchanged)
        }
    }

    fn record(&self, outcome: WriteOutcome) {
        let mut stats = self.stats.lock();
        match outcome {
            WriteOutcome::Reused => stats.reused += 1,
            WriteOutcome::Written => stats.written += 1,
            WriteOutcome::Unchanged => stats.unchanged += 1,
        }
    }

    /// Delete every merged file in the directory.
    ///
    /// Other files are left alone. A missing directory counts as clean.
    pub fn clean(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            let is_merged = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with("merged-"));

            if is_merged && entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        debug!(dir = %self.dir.display(), removed, "cleaned merged files");
        Ok(removed)
    }
}
