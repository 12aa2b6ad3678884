//! Shared test utilities for sheaf-bundler tests
//!
//! This module provides common helper functions used across test files
//! to reduce duplication and ensure consistent test patterns.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use sheaf_bundler::{CompileOutput, Compiler, CompilerConfig, Resource};
use tempfile::TempDir;

/// A compiler writing everything under `temp`, in production mode by default.
pub fn test_compiler(temp: &TempDir) -> Compiler {
    Compiler::new(test_config(temp))
}

/// Configuration with per-bundle output in `<temp>/build` and merged files
/// in `<temp>/merged`.
pub fn test_config(temp: &TempDir) -> CompilerConfig {
    CompilerConfig {
        merged_dir: temp.path().join("merged"),
        output_dir: temp.path().join("build"),
        public_path: "/static".to_string(),
        ..CompilerConfig::default()
    }
}

/// Write source files into `<dir>/src` and return their paths in order.
pub fn write_sources(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    let src = dir.join("src");
    fs::create_dir_all(&src).expect("create src");

    files
        .iter()
        .map(|(name, contents)| {
            let path = src.join(name);
            fs::write(&path, contents).expect("write source");
            path
        })
        .collect()
}

/// File stem of a resource (`full` for `/build/full.js`).
pub fn stem(resource: &Resource) -> String {
    resource
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File stems of every resource in the output, in order.
pub fn stems(output: &CompileOutput) -> Vec<String> {
    output.resources.iter().map(stem).collect()
}

/// Merged files currently present in `dir`, sorted by name.
pub fn merged_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .map(|e| e.expect("dir entry").path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("merged-"))
        })
        .collect();
    files.sort();
    files
}

/// Read a file as UTF-8, panicking with the path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
