//! The bundle model.
//!
//! A [`Bundle`] is a named unit of front-end source. Bundles are wired
//! together with builder-style methods and then shared as `Arc<Bundle>`;
//! once wired they are never mutated.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{BundleKind, CompileContext, Dependency, DependencyType, Resource, Result};

#[derive(Debug, Clone)]
pub struct Bundle {
    /// Identifier, unique within one graph traversal
    pub name: String,
    /// `Some(true)` development, `Some(false)` production, `None` inherit
    pub debug: Option<bool>,
    /// Edges keyed by dependency name, in declaration order
    pub dependencies: IndexMap<String, Dependency>,
    /// Siblings compiled for their side effects only
    pub references: IndexMap<String, Arc<Bundle>>,
    kind: Arc<dyn BundleKind>,
}

impl Bundle {
    /// Create an unwired bundle of the given kind.
    pub fn create(name: impl Into<String>, kind: Arc<dyn BundleKind>) -> Self {
        Self {
            name: name.into(),
            debug: None,
            dependencies: IndexMap::new(),
            references: IndexMap::new(),
            kind,
        }
    }

    /// Set the debug flag.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Add a LINK dependency.
    ///
    /// Re-declaring a dependency name replaces the previous edge.
    pub fn add_dependency(self, bundle: impl Into<Arc<Bundle>>) -> Self {
        self.with_edge(bundle.into(), DependencyType::Link)
    }

    /// Add LINK dependencies in order.
    pub fn add_dependencies<I, B>(self, bundles: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Arc<Bundle>>,
    {
        bundles
            .into_iter()
            .fold(self, |bundle, dep| bundle.add_dependency(dep))
    }

    /// Add a MERGE dependency.
    ///
    /// Re-declaring a dependency name replaces the previous edge.
    pub fn merge(self, bundle: impl Into<Arc<Bundle>>) -> Self {
        self.with_edge(bundle.into(), DependencyType::Merge)
    }

    /// Add a sibling that is compiled alongside but never linked in.
    pub fn add_reference(mut self, bundle: impl Into<Arc<Bundle>>) -> Self {
        let bundle = bundle.into();
        self.references.insert(bundle.name.clone(), bundle);
        self
    }

    fn with_edge(mut self, bundle: Arc<Bundle>, edge: DependencyType) -> Self {
        // IndexMap keeps the slot of an existing key, so a re-declared edge
        // stays where it was first declared.
        self.dependencies
            .insert(bundle.name.clone(), Dependency::new(bundle, edge));
        self
    }

    pub fn kind(&self) -> &Arc<dyn BundleKind> {
        &self.kind
    }

    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.get(name)
    }

    /// Resolve the tri-state debug flag against a process default.
    pub fn effective_debug(&self, default: bool) -> bool {
        self.debug.unwrap_or(default)
    }

    /// Compile this bundle's own sources through its kind.
    pub fn compile(&self, ctx: &CompileContext) -> Result<Vec<Resource>> {
        self.kind.compile(self, ctx)
    }
}
