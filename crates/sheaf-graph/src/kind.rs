//! The capability set every concrete bundle kind provides.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Bundle, MimeKind, Resource, Result};

/// What a bundle kind gets to see while compiling its own sources.
#[derive(Debug, Clone)]
pub struct CompileContext {
    /// Directory compiled per-bundle files are written to
    pub output_dir: PathBuf,
    /// Public URI prefix matching `output_dir`
    pub public_path: String,
    /// Effective debug flag of the compile request
    pub debug: bool,
}

impl CompileContext {
    pub fn new(output_dir: impl Into<PathBuf>, public_path: impl Into<String>, debug: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            public_path: public_path.into(),
            debug,
        }
    }

    /// Public link for a file name inside `output_dir`.
    pub fn link_for(&self, file_name: &str) -> String {
        join_link(&self.public_path, file_name)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Join a public base path and a file name with exactly one slash.
pub fn join_link(base: &str, file_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file_name)
}

/// A concrete kind of bundle (script, stylesheet, typed script, ...).
///
/// `compile` produces the bundle's own artifacts, ignoring its dependencies.
/// `can_merge` and `merge_files` describe how artifacts of a mime kind are
/// folded into one physical file in production mode.
pub trait BundleKind: fmt::Debug + Send + Sync {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Compile the bundle's own sources.
    fn compile(&self, bundle: &Bundle, ctx: &CompileContext) -> Result<Vec<Resource>>;

    /// Whether this kind knows how to merge files of `mime`.
    fn can_merge(&self, mime: &MimeKind) -> bool;

    /// Merge `files` (in order) into the contents of one artifact.
    fn merge_files(&self, files: &[PathBuf], debug: bool) -> Result<Vec<u8>>;
}
