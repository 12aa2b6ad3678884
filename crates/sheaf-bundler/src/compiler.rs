//! The compile orchestrator.
//!
//! [`Compiler::compile`] runs one whole-tree compile of a root bundle:
//!
//! 1. compile every reference of the root for its side effects
//! 2. resolve the root's dependencies into build order
//! 3. compile each bundle's own sources through its kind
//! 4. compose the artifact lists bottom-up, ending with the root
//! 5. merge the remaining groups into physical files
//!
//! Production results are memoized by the root's fingerprint. Development
//! compiles always run so edited sources show up on the next compile.

use std::path::Path;
use std::sync::Arc;

use sheaf_graph::resolver::sorted_dependencies_with_limit;
use sheaf_graph::{Bundle, BundleKind, CompileContext, MimeKind, Resource};
use tracing::{debug, info};

use crate::composer::{Composed, compose};
use crate::config::CompilerConfig;
use crate::memo::CompileMemo;
use crate::merge::{MergedFileStore, compact};
use crate::Result;

/// The flat, ordered resources of one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
    pub resources: Vec<Resource>,
}

impl CompileOutput {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    pub fn files(&self) -> Vec<&Path> {
        self.resources.iter().map(Resource::file).collect()
    }

    pub fn links(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.link.as_str()).collect()
    }

    /// The mime kind shared by every resource, if there is exactly one.
    pub fn mime_kind(&self) -> Option<&MimeKind> {
        let first = &self.resources.first()?.mime;
        self.resources
            .iter()
            .all(|r| &r.mime == first)
            .then_some(first)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// What [`Compiler::clean`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed_files: usize,
}

#[derive(Debug, Clone)]
pub struct Compiler {
    config: CompilerConfig,
    memo: Arc<CompileMemo>,
    store: Arc<MergedFileStore>,
}

impl Compiler {
    /// A compiler with its own memo and a merged file store at
    /// `config.merged_dir`.
    pub fn new(config: CompilerConfig) -> Self {
        let store = MergedFileStore::new(&config.merged_dir, config.public_path.clone());
        Self::with_caches(config, Arc::new(CompileMemo::new()), Arc::new(store))
    }

    /// A compiler sharing the given caches.
    pub fn with_caches(config: CompilerConfig, memo: Arc<CompileMemo>, store: Arc<MergedFileStore>) -> Self {
        Self { config, memo, store }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn memo(&self) -> &Arc<CompileMemo> {
        &self.memo
    }

    pub fn store(&self) -> &Arc<MergedFileStore> {
        &self.store
    }

    /// Compile `root`, reusing the memoized output of a structurally
    /// identical graph.
    ///
    /// Only production compiles go through the memo, so compilers with
    /// different default modes can share one.
    pub fn compile(&self, root: &Bundle) -> Result<Arc<CompileOutput>> {
        if root.effective_debug(self.config.debug) {
            return self.compile_uncached(root).map(Arc::new);
        }

        let fingerprint = root.fingerprint();
        self.memo
            .get_or_try_compile(&fingerprint, || self.compile_uncached(root))
    }

    /// Compile `root` without consulting the memo.
    ///
    /// References are still compiled through [`Compiler::compile`].
    pub fn compile_uncached(&self, root: &Bundle) -> Result<CompileOutput> {
        for reference in root.references.values() {
            debug!(bundle = %root.name, reference = %reference.name, "compiling reference");
            self.compile(reference)?;
        }

        let debug_mode = root.effective_debug(self.config.debug);
        let dependencies = sorted_dependencies_with_limit(root, self.config.resolution_limit)?;
        let ctx = CompileContext::new(&self.config.output_dir, self.config.public_path.clone(), debug_mode);

        let mut kinds: Vec<Arc<dyn BundleKind>> = Vec::with_capacity(dependencies.len() + 1);
        kinds.push(Arc::clone(root.kind()));

        let mut composed = Composed::default();
        for dependency in &dependencies {
            let bundle = &dependency.bundle;
            kinds.push(Arc::clone(bundle.kind()));

            let own = bundle.compile(&ctx)?;
            debug!(bundle = %bundle.name, resources = own.len(), edge = %dependency.edge, "compiled bundle");

            let artifacts = compose(bundle, own, &composed, debug_mode);
            composed.insert(bundle.name.clone(), artifacts);
        }

        let own = root.compile(&ctx)?;
        let artifacts = compose(root, own, &composed, debug_mode);
        let resources = compact(artifacts, &kinds, &self.store, debug_mode)?;

        info!(
            bundle = %root.name,
            debug = debug_mode,
            dependencies = dependencies.len(),
            resources = resources.len(),
            "compiled bundle graph"
        );

        Ok(CompileOutput::new(resources))
    }

    /// Delete every merged file and forget all memoized compiles.
    pub fn clean(&self) -> Result<CleanReport> {
        let removed_files = self.store.clean()?;
        self.memo.clear();
        info!(dir = %self.store.dir().display(), removed_files, "cleaned merged files");
        Ok(CleanReport { removed_files })
    }
}
