//! Test helpers shared across the workspace.
//!
//! [`StubKind`] is a bundle kind that never touches the file system: it
//! reports one resource per bundle and "merges" by joining file stems, so
//! tests can assert on the merge order directly.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{Bundle, BundleKind, CompileContext, MimeKind, Resource, Result};

#[derive(Debug)]
pub struct StubKind {
    mime: MimeKind,
    compiles: AtomicUsize,
    merges: AtomicUsize,
}

impl StubKind {
    pub fn new(mime: MimeKind) -> Arc<Self> {
        Arc::new(Self {
            mime,
            compiles: AtomicUsize::new(0),
            merges: AtomicUsize::new(0),
        })
    }

    pub fn script() -> Arc<Self> {
        Self::new(MimeKind::Script)
    }

    pub fn stylesheet() -> Arc<Self> {
        Self::new(MimeKind::Stylesheet)
    }

    /// Number of `compile` calls so far.
    pub fn compiles(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    /// Number of `merge_files` calls so far.
    pub fn merges(&self) -> usize {
        self.merges.load(Ordering::SeqCst)
    }

    fn extension(&self) -> &'static str {
        match self.mime {
            MimeKind::Script => "js",
            MimeKind::Stylesheet => "css",
            MimeKind::Other(_) => "bin",
        }
    }
}

impl BundleKind for StubKind {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn compile(&self, bundle: &Bundle, ctx: &CompileContext) -> Result<Vec<Resource>> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        let file_name = format!("{}.{}", bundle.name, self.extension());
        Ok(vec![Resource::new(
            self.mime.clone(),
            ctx.output_path(&file_name),
            ctx.link_for(&file_name),
        )])
    }

    fn can_merge(&self, mime: &MimeKind) -> bool {
        *mime == self.mime
    }

    fn merge_files(&self, files: &[PathBuf], _debug: bool) -> Result<Vec<u8>> {
        self.merges.fetch_add(1, Ordering::SeqCst);
        let stems: Vec<String> = files
            .iter()
            .map(|f| {
                f.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect();
        Ok(stems.join(" ").into_bytes())
    }
}

/// A bare bundle of a stub kind.
pub fn stub(name: &str, kind: &Arc<StubKind>) -> Bundle {
    Bundle::create(name, kind.clone())
}

/// The reference graphs used throughout the test suites, built on one
/// shared [`StubKind`].
///
/// ```text
/// full ── link ──▶ m3 ── merge ──▶ m2 ── merge ──▶ m1
///      └─ link ──▶ n12 ─ merge ──▶ n1
///                      └ merge ──▶ n2
/// ```
#[derive(Debug, Clone)]
pub struct MockBundles {
    pub kind: Arc<StubKind>,
}

impl Default for MockBundles {
    fn default() -> Self {
        Self::new(StubKind::script())
    }
}

impl MockBundles {
    pub fn new(kind: Arc<StubKind>) -> Self {
        Self { kind }
    }

    fn bundle(&self, name: &str) -> Bundle {
        stub(name, &self.kind)
    }

    pub fn foo(&self) -> Bundle {
        self.bundle("foo").debug(true)
    }

    pub fn bar(&self) -> Bundle {
        self.bundle("bar").debug(true).add_dependency(self.foo())
    }

    pub fn bar_merged(&self) -> Bundle {
        self.bundle("barMerged").debug(true).merge(self.foo())
    }

    pub fn foo_bar(&self) -> Bundle {
        self.bundle("fooBar").debug(true).add_dependency(self.bar())
    }

    pub fn m1(&self) -> Bundle {
        self.bundle("m1")
    }

    pub fn m2(&self) -> Bundle {
        self.bundle("m2").merge(self.m1())
    }

    pub fn m3(&self) -> Bundle {
        self.bundle("m3").merge(self.m2())
    }

    pub fn n1(&self) -> Bundle {
        self.bundle("n1")
    }

    pub fn n2(&self) -> Bundle {
        self.bundle("n2")
    }

    pub fn n12(&self) -> Bundle {
        self.bundle("n12").merge(self.n1()).merge(self.n2())
    }

    pub fn full(&self) -> Bundle {
        self.bundle("full")
            .add_dependency(self.m3())
            .add_dependency(self.n12())
    }
}

/// Shorthands for [`MockBundles`] on a fresh stub kind.
pub mod mock {
    use super::MockBundles;
    use crate::Bundle;

    pub fn foo() -> Bundle {
        MockBundles::default().foo()
    }

    pub fn bar() -> Bundle {
        MockBundles::default().bar()
    }

    pub fn bar_merged() -> Bundle {
        MockBundles::default().bar_merged()
    }

    pub fn foo_bar() -> Bundle {
        MockBundles::default().foo_bar()
    }

    pub fn full() -> Bundle {
        MockBundles::default().full()
    }
}
