#![cfg_attr(docsrs, feature(doc_cfg))]

//! # sheaf-bundler
//!
//! Composes, merges and caches builds of resource bundle graphs.
//!
//! The graph itself (bundles, typed dependency edges, resolution) lives in
//! `sheaf-graph`. This crate drives a compile of a root bundle: it resolves
//! the build order, compiles each bundle through its kind, folds the results
//! together along LINK and MERGE edges, and turns every pending merge group
//! into one content-addressed file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use sheaf_bundler::{Bundle, Compiler, CompilerConfig, ScriptBundle};
//!
//! # fn main() -> sheaf_bundler::Result<()> {
//! let jquery = Bundle::create("jquery", Arc::new(ScriptBundle::new(["vendor/jquery.js"])));
//! let app = Bundle::create("app", Arc::new(ScriptBundle::new(["src/app.js"])))
//!     .debug(false)
//!     .merge(jquery);
//!
//! let compiler = Compiler::new(CompilerConfig::load(None)?);
//! for link in compiler.compile(&app)?.links() {
//!     println!("<script src=\"{link}\"></script>");
//! }
//! # Ok(()) }
//! ```

pub use sheaf_graph::*;

pub mod artifact;
pub mod compiler;
pub mod composer;
pub mod config;
pub mod kinds;
pub mod memo;
pub mod merge;
pub mod output;

pub use artifact::{Artifact, MergeGroup, flatten};
pub use compiler::{CleanReport, CompileOutput, Compiler};
pub use composer::compose;
pub use config::CompilerConfig;
pub use kinds::{ScriptBundle, StylesheetBundle};
pub use memo::CompileMemo;
pub use merge::{ContentKey, MergedFileStore, StoreStats, WriteOutcome, compact, content_key};

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

/// Error types for sheaf-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from the graph crate: resolution or a bundle kind's compile.
    #[error(transparent)]
    Graph(#[from] sheaf_graph::Error),

    /// A merge group holds resources of more than one mime kind.
    #[error("cannot merge mixed mime types in group '{group}': {}", kinds.join(", "))]
    MixedMimeKinds { group: String, kinds: Vec<String> },

    /// The mime kind has no merged file format.
    #[error("unsupported mime type for merging: {0}")]
    UnsupportedMimeKind(MimeKind),

    /// No bundle kind in the graph can merge the mime kind.
    #[error("no merge strategy for mime type: {0}")]
    NoMergeStrategy(MimeKind),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),
}

/// Result type alias for sheaf-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Graph(sheaf_graph::Error::DependencyCycle(_)) => "DEPENDENCY_CYCLE",
            Error::Graph(sheaf_graph::Error::Unresolvable { .. }) => "UNRESOLVABLE_GRAPH",
            Error::Graph(sheaf_graph::Error::CompileFailed { .. }) => "COMPILE_FAILED",
            Error::Graph(sheaf_graph::Error::Io(_)) => "IO_ERROR",
            Error::MixedMimeKinds { .. } => "MIXED_MIME_KINDS",
            Error::UnsupportedMimeKind(_) => "UNSUPPORTED_MIME_KIND",
            Error::NoMergeStrategy(_) => "NO_MERGE_STRATEGY",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Io(_) => "IO_ERROR",
            Error::WriteFailure(_) => "WRITE_FAILURE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Graph(sheaf_graph::Error::DependencyCycle(chain)) => Some(Box::new(format!(
                "Bundles depend on each other in a loop: {}\nRemove one of the edges to break the cycle.",
                chain
            ))),
            Error::Graph(sheaf_graph::Error::Unresolvable { .. }) => Some(Box::new(
                "The graph did not settle within the resolution limit. Raise `resolution_limit` for very deep graphs.",
            )),
            Error::MixedMimeKinds { group, .. } => Some(Box::new(format!(
                "Bundle '{}' merges dependencies of a different type. Use a LINK edge for those instead.",
                group
            ))),
            Error::UnsupportedMimeKind(kind) => Some(Box::new(format!(
                "Only scripts and stylesheets can be merged. Link '{}' resources instead.",
                kind
            ))),
            Error::NoMergeStrategy(kind) => Some(Box::new(format!(
                "No bundle kind in this graph can merge '{}'.",
                kind
            ))),
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "Check your configuration file for syntax errors.\nError: {}",
                msg
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    fn code(err: &Error) -> String {
        err.code().map(|c| c.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_diagnostic_codes() {
        let cycle = Error::from(sheaf_graph::Error::DependencyCycle(DependencyChain::new(vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
        ])));
        assert_eq!(code(&cycle), "DEPENDENCY_CYCLE");
        assert_eq!(cycle.to_string(), "dependency cycle detected: a -> b -> a");
        assert!(cycle.help().is_some());

        let unresolvable = Error::from(sheaf_graph::Error::Unresolvable {
            resolved: 1,
            total: 3,
            iterations: 10,
        });
        assert_eq!(code(&unresolvable), "UNRESOLVABLE_GRAPH");

        assert_eq!(code(&Error::NoMergeStrategy(MimeKind::Script)), "NO_MERGE_STRATEGY");
        assert_eq!(
            code(&Error::from(std::io::Error::other("disk full"))),
            "IO_ERROR"
        );
    }

    #[test]
    fn test_mixed_kinds_message() {
        let err = Error::MixedMimeKinds {
            group: "app".to_string(),
            kinds: vec!["application/javascript".to_string(), "text/css".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "cannot merge mixed mime types in group 'app': application/javascript, text/css"
        );
        assert_eq!(code(&err), "MIXED_MIME_KINDS");
    }
}
