use std::path::PathBuf;

use sheaf_graph::{Bundle, BundleKind, CompileContext, MimeKind, Resource, Result};

use super::{compile_concat, merge_concat};

/// Plain JavaScript sources, concatenated in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptBundle {
    files: Vec<PathBuf>,
}

impl ScriptBundle {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl BundleKind for ScriptBundle {
    fn name(&self) -> &'static str {
        "script"
    }

    fn compile(&self, bundle: &Bundle, ctx: &CompileContext) -> Result<Vec<Resource>> {
        compile_concat(bundle, &self.files, MimeKind::Script, "js", ctx)
    }

    fn can_merge(&self, mime: &MimeKind) -> bool {
        *mime == MimeKind::Script
    }

    fn merge_files(&self, files: &[PathBuf], _debug: bool) -> Result<Vec<u8>> {
        merge_concat(files)
    }
}
