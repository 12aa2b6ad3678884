//! Dependency chains between bundles.
//!
//! A chain is a path of bundle names through the dependency graph. The
//! resolver uses it to report the offending path when the name-level graph
//! contains a cycle.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::Dependency;

/// A path of bundle names, from the depending bundle to its dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChain {
    /// The bundle names along the path
    pub path: Vec<String>,
    /// Depth of this chain (path length - 1)
    pub depth: usize,
}

impl DependencyChain {
    /// Create a new dependency chain from a path.
    pub fn new(path: Vec<String>) -> Self {
        let depth = path.len().saturating_sub(1);
        Self { path, depth }
    }

    /// First bundle in the chain.
    pub fn start(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    /// Last bundle in the chain.
    pub fn end(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Check if this chain contains a cycle (same bundle appears twice).
    pub fn has_cycle(&self) -> bool {
        let mut seen = rustc_hash::FxHashSet::default();
        self.path.iter().any(|name| !seen.insert(name))
    }

    /// Format the chain as a human-readable string.
    ///
    /// Example: "app -> vendor -> app"
    pub fn format_chain(&self) -> String {
        self.path.join(" -> ")
    }
}

impl fmt::Display for DependencyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_chain())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Find a cycle in the name-level graph described by a flattened dependency
/// list. Edges are taken from the bundle registered under each name.
pub(crate) fn find_cycle(deps: &IndexMap<String, Dependency>) -> Option<DependencyChain> {
    let mut marks: FxHashMap<&str, Mark> = FxHashMap::default();
    let mut stack: Vec<&str> = Vec::new();

    deps.keys()
        .find_map(|name| visit(name, deps, &mut marks, &mut stack))
}

fn visit<'a>(
    name: &'a str,
    deps: &'a IndexMap<String, Dependency>,
    marks: &mut FxHashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
) -> Option<DependencyChain> {
    match marks.get(name) {
        Some(Mark::Done) => return None,
        Some(Mark::InProgress) => {
            let start = stack.iter().position(|n| *n == name).unwrap_or(0);
            let mut path: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
            path.push(name.to_string());
            return Some(DependencyChain::new(path));
        }
        None => {}
    }

    // names outside the flattened list are leaves
    let dependency = deps.get(name)?;

    marks.insert(name, Mark::InProgress);
    stack.push(name);
    for child in dependency.bundle.dependencies.keys() {
        if let Some(chain) = visit(child, deps, marks, stack) {
            return Some(chain);
        }
    }
    stack.pop();
    marks.insert(name, Mark::Done);

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bundle;
    use crate::resolver::dependency_list;
    use crate::test_utils::{StubKind, mock, stub};

    fn chain(names: &[&str]) -> DependencyChain {
        DependencyChain::new(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_dependency_chain_creation() {
        let chain = chain(&["app", "vendor", "jquery"]);

        assert_eq!(chain.depth, 2);
        assert_eq!(chain.start(), Some("app"));
        assert_eq!(chain.end(), Some("jquery"));
        assert!(!chain.has_cycle());
    }

    #[test]
    fn test_empty_chain() {
        let chain = DependencyChain::new(Vec::new());
        assert_eq!(chain.depth, 0);
        assert_eq!(chain.start(), None);
        assert!(!chain.has_cycle());
    }

    #[test]
    fn test_dependency_chain_cycle_detection() {
        assert!(chain(&["a", "b", "a"]).has_cycle());
        assert!(!chain(&["a", "b", "c"]).has_cycle());
    }

    #[test]
    fn test_format_chain() {
        assert_eq!(chain(&["a", "b", "a"]).format_chain(), "a -> b -> a");
        assert_eq!(chain(&["a", "b", "a"]).to_string(), "a -> b -> a");
    }

    #[test]
    fn test_find_cycle_none_for_dag() {
        let full = mock::full();
        assert_eq!(find_cycle(&dependency_list(&full)), None);
    }

    #[test]
    fn test_find_cycle_reports_name_level_cycle() {
        // x -> y -> x, expressed through distinct instances sharing names
        let kind = StubKind::script();
        let inner_x = Bundle::create("x", kind.clone()).add_dependency(stub("y", &kind));
        let y = Bundle::create("y", kind.clone()).add_dependency(inner_x);
        let x = Bundle::create("x", kind.clone()).add_dependency(y);
        let root = Bundle::create("root", kind).add_dependency(x);

        let found = find_cycle(&dependency_list(&root)).expect("cycle");
        assert_eq!(found.format_chain(), "x -> y -> x");
        assert!(found.has_cycle());
    }

    #[test]
    fn test_find_cycle_self_reference() {
        let kind = StubKind::script();
        let a = Bundle::create("a", kind.clone()).add_dependency(stub("a", &kind));
        let root = Bundle::create("root", kind).add_dependency(a);

        let found = find_cycle(&dependency_list(&root)).expect("cycle");
        assert_eq!(found.path, vec!["a".to_string(), "a".to_string()]);
    }
}
