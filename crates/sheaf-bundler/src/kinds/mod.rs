//! Built-in bundle kinds.
//!
//! Both kinds concatenate plain source files: [`ScriptBundle`] for
//! JavaScript and [`StylesheetBundle`] for CSS. Minification is left to
//! kinds that wrap an external tool.

mod script;
mod stylesheet;

pub use script::ScriptBundle;
pub use stylesheet::StylesheetBundle;

use std::fs;
use std::path::PathBuf;

use sheaf_graph::{Bundle, CompileContext, MimeKind, Resource};
use tracing::debug;

use crate::output::{file_stem, write_if_changed};

/// Length of the content hash embedded in compiled file names.
const HASH_LEN: usize = 16;

/// Read `files` in order and join them with newlines.
fn concat(files: &[PathBuf]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    for (i, file) in files.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend(fs::read(file)?);
    }
    Ok(out)
}

fn compile_failed(bundle: &str, message: impl std::fmt::Display) -> sheaf_graph::Error {
    sheaf_graph::Error::CompileFailed {
        bundle: bundle.to_string(),
        message: message.to_string(),
    }
}

/// Concatenate a bundle's sources into `<output_dir>/<name>-<hash>.<ext>`.
fn compile_concat(
    bundle: &Bundle,
    files: &[PathBuf],
    mime: MimeKind,
    extension: &str,
    ctx: &CompileContext,
) -> sheaf_graph::Result<Vec<Resource>> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let contents = concat(files).map_err(|e| compile_failed(&bundle.name, e))?;
    let hash = blake3::hash(&contents).to_hex();
    let file_name = format!("{}-{}.{}", file_stem(&bundle.name), &hash[..HASH_LEN], extension);
    let path = ctx.output_path(&file_name);

    let written = write_if_changed(&path, &contents).map_err(|e| compile_failed(&bundle.name, e))?;
    debug!(bundle = %bundle.name, file = %path.display(), written, "compiled sources");

    Ok(vec![Resource::new(mime, path, ctx.link_for(&file_name))])
}

fn merge_concat(files: &[PathBuf]) -> sheaf_graph::Result<Vec<u8>> {
    concat(files).map_err(sheaf_graph::Error::from)
}
