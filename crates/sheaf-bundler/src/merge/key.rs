//! Content keys for merged files using BLAKE3.
//!
//! The key identifies a merge group by the ordered list of its source files,
//! so reordering the inputs yields a different merged file.

use std::path::{Path, PathBuf};

use blake3::Hasher;

use crate::output::file_stem;

/// Content-addressed key of a merge group (BLAKE3 hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    /// Create a content key from a hex string.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Get the content key as a hex string.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the content key for an ordered list of source files.
pub fn content_key(files: &[PathBuf]) -> ContentKey {
    let mut hasher = Hasher::new();
    for file in files {
        hash_path(&mut hasher, file);
    }
    ContentKey(hasher.finalize().to_hex().to_string())
}

fn hash_path(hasher: &mut Hasher, path: &Path) {
    hasher.update(path.as_os_str().as_encoded_bytes());
    hasher.update(b"\0"); // separator
}

/// Name of the merged file for a group.
pub fn merged_file_name(group: &str, key: &ContentKey, extension: &str) -> String {
    format!("merged-{}-{key}.{extension}", file_stem(group))
}
