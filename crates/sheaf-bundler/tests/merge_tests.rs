//! Merged file tests with the built-in script and stylesheet kinds.
//!
//! These tests verify that merged files on disk behave as a cache:
//! - identical builds reuse the merged file without rewriting it
//! - reordering inputs produces a new merged file
//! - failed compiles leave nothing cached

mod helpers;

use std::fs;
use std::sync::Arc;

use helpers::{merged_files, read, test_compiler, test_config, write_sources};
use sheaf_bundler::{
    Bundle, Compiler, Error, MimeKind, ScriptBundle, StoreStats, StylesheetBundle,
};
use tempfile::TempDir;

fn script(name: &str, files: &[std::path::PathBuf]) -> Bundle {
    Bundle::create(name, Arc::new(ScriptBundle::new(files.iter().cloned())))
}

fn stylesheet(name: &str, files: &[std::path::PathBuf]) -> Bundle {
    Bundle::create(name, Arc::new(StylesheetBundle::new(files.iter().cloned())))
}

#[test]
fn production_build_merges_real_sources() {
    let temp = TempDir::new().unwrap();
    let src = write_sources(
        temp.path(),
        &[("jquery.js", "var $ = {};"), ("app.js", "$.ready();")],
    );
    let compiler = test_compiler(&temp);

    let app = script("app", &src[1..])
        .debug(false)
        .merge(script("jquery", &src[..1]));

    let output = compiler.compile(&app).unwrap();
    assert_eq!(output.len(), 1);
    assert_eq!(output.mime_kind(), Some(&MimeKind::Script));
    assert_eq!(read(&output.resources[0].file), "var $ = {};\n$.ready();");
}

#[test]
fn debug_build_links_compiled_sources() {
    let temp = TempDir::new().unwrap();
    let src = write_sources(
        temp.path(),
        &[("jquery.js", "var $ = {};"), ("app.js", "$.ready();")],
    );
    let compiler = test_compiler(&temp);

    let app = script("app", &src[1..])
        .debug(true)
        .merge(script("jquery", &src[..1]));

    let output = compiler.compile(&app).unwrap();
    let links = output.links();
    assert_eq!(links.len(), 2);
    assert!(links[0].starts_with("/static/jquery-"));
    assert!(links[1].starts_with("/static/app-"));
    assert_eq!(read(&output.resources[1].file), "$.ready();");
    assert!(merged_files(&temp.path().join("merged")).is_empty());
}

#[test]
fn debug_build_picks_up_edited_sources() {
    let temp = TempDir::new().unwrap();
    let src = write_sources(temp.path(), &[("app.js", "v1();")]);
    let compiler = test_compiler(&temp);
    let app = || script("app", &src).debug(true);

    let before = compiler.compile(&app()).unwrap();
    assert_eq!(read(&before.resources[0].file), "v1();");

    fs::write(&src[0], "v2();").unwrap();
    let after = compiler.compile(&app()).unwrap();

    assert_eq!(read(&after.resources[0].file), "v2();");
    assert_ne!(before.resources, after.resources);
    assert!(compiler.memo().is_empty());
}

#[test]
fn identical_build_does_not_rewrite_merged_file() {
    let temp = TempDir::new().unwrap();
    let src = write_sources(temp.path(), &[("a.css", "a{}"), ("b.css", "b{}")]);
    let graph = || {
        stylesheet("site", &src[1..])
            .debug(false)
            .merge(stylesheet("reset", &src[..1]))
    };

    let first = test_compiler(&temp);
    let output = first.compile(&graph()).unwrap();
    let merged = output.resources[0].file.clone();
    let before = fs::read(&merged).unwrap();
    let modified = fs::metadata(&merged).unwrap().modified().unwrap();

    // A fresh compiler has an empty memo but shares the directory.
    let second = test_compiler(&temp);
    let again = second.compile(&graph()).unwrap();

    assert_eq!(again.resources, output.resources);
    assert_eq!(fs::read(&merged).unwrap(), before);
    assert_eq!(fs::metadata(&merged).unwrap().modified().unwrap(), modified);
    assert_eq!(
        second.store().stats(),
        StoreStats {
            reused: 1,
            written: 0,
            unchanged: 0
        }
    );
}

#[test]
fn reordered_inputs_produce_a_new_file() {
    let temp = TempDir::new().unwrap();
    let src = write_sources(temp.path(), &[("one.js", "1"), ("two.js", "2")]);
    let merged_dir = temp.path().join("merged");

    let graph = |first: usize, second: usize| {
        script("pair", &src[second..=second])
            .debug(false)
            .merge(script("lib", &src[first..=first]))
    };

    let forward = test_compiler(&temp).compile(&graph(0, 1)).unwrap();
    let backward = test_compiler(&temp).compile(&graph(1, 0)).unwrap();

    assert_ne!(forward.resources[0].file, backward.resources[0].file);
    assert_eq!(read(&forward.resources[0].file), "1\n2");
    assert_eq!(read(&backward.resources[0].file), "2\n1");
    assert_eq!(merged_files(&merged_dir).len(), 2);
}

#[test]
fn failed_compile_is_retried() {
    let temp = TempDir::new().unwrap();
    let compiler = test_compiler(&temp);
    let missing = temp.path().join("src/late.js");
    let bundle = || script("late", &[missing.clone()]);

    let err = compiler.compile(&bundle()).unwrap_err();
    assert!(matches!(
        err,
        Error::Graph(sheaf_graph::Error::CompileFailed { ref bundle, .. }) if bundle == "late"
    ));
    assert!(compiler.memo().is_empty());

    write_sources(temp.path(), &[("late.js", "ok();")]);
    let output = compiler.compile(&bundle()).unwrap();
    assert_eq!(read(&output.resources[0].file), "ok();");
}

#[test]
fn stylesheets_and_scripts_link_side_by_side() {
    let temp = TempDir::new().unwrap();
    let src = write_sources(temp.path(), &[("site.css", "body{}"), ("site.js", "go();")]);
    let compiler = Compiler::new(test_config(&temp));

    let page = script("page", &src[1..])
        .debug(false)
        .add_dependency(stylesheet("styles", &src[..1]));

    let output = compiler.compile(&page).unwrap();
    assert_eq!(output.len(), 2);
    assert_eq!(output.resources[0].mime, MimeKind::Stylesheet);
    assert_eq!(output.resources[1].mime, MimeKind::Script);
    assert_eq!(output.mime_kind(), None);
}
