//! # sheaf-graph
//!
//! Pure data structures for resource bundle graphs.
//!
//! This crate owns everything about a bundle graph that does not touch the
//! file system: the [`Bundle`] model and its typed [`Dependency`] edges, the
//! structural [`Fingerprint`] used as a whole-compile cache key, and the
//! dependency [`resolver`] that turns a root bundle into a build order.
//!
//! ## Overview
//!
//! ```text
//!            ┌──────────────┐
//!            │ Bundle (root)│
//!            └──────┬───────┘
//!        LINK / MERGE edges (by name)
//!          ┌────────┴────────┐
//!          ▼                 ▼
//!    ┌──────────┐      ┌──────────┐
//!    │  Bundle  │      │  Bundle  │ ── references (side-effect builds)
//!    └──────────┘      └──────────┘
//!          │
//!          ▼
//!    resolver::sorted_dependencies  →  [deps..., in build order]
//! ```
//!
//! Concrete bundle kinds (scripts, stylesheets, ...) plug in through the
//! [`BundleKind`] trait. Composition, merging and caching live in
//! `sheaf-bundler`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheaf_graph::{Bundle, resolver};
//!
//! let foo = Bundle::create("foo", kind.clone());
//! let bar = Bundle::create("bar", kind).add_dependency(foo);
//!
//! let order = resolver::sorted_dependencies(&bar)?;
//! assert_eq!(order[0].name(), "foo");
//! ```

pub mod bundle;
pub mod dependency;
pub mod dependency_chain;
pub mod fingerprint;
pub mod kind;
pub mod resolver;
pub mod resource;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bundle::Bundle;
pub use dependency::{Dependency, DependencyType};
pub use dependency_chain::DependencyChain;
pub use fingerprint::Fingerprint;
pub use kind::{BundleKind, CompileContext};
pub use resolver::DEFAULT_RESOLUTION_LIMIT;
pub use resource::{MimeKind, Resource};

/// Error types for bundle graph operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The name-level dependency graph contains a cycle.
    #[error("dependency cycle detected: {0}")]
    DependencyCycle(DependencyChain),

    /// The resolver gave up after exhausting its iteration bound.
    #[error(
        "dependency graph cannot be resolved: ordered {resolved} of {total} bundles after {iterations} passes"
    )]
    Unresolvable {
        resolved: usize,
        total: usize,
        iterations: usize,
    },

    /// A bundle kind failed to produce its own artifacts.
    #[error("bundle '{bundle}' failed to compile: {message}")]
    CompileFailed { bundle: String, message: String },

    /// I/O error raised by a bundle kind.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;
