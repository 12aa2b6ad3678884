//! Dependency resolution.
//!
//! Flattens everything reachable from a root bundle into one list keyed by
//! bundle name, then orders it in passes: each pass appends every bundle
//! whose own dependencies are already ordered. The root itself is not part
//! of the result.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::dependency_chain::find_cycle;
use crate::{Bundle, Dependency, Error, Result};

/// Maximum number of ordering passes before the graph is declared
/// unresolvable.
pub const DEFAULT_RESOLUTION_LIMIT: usize = 100_000;

/// Every dependency edge reachable from `root`, keyed by bundle name.
///
/// The first edge found for a name wins. Bundle instances that were already
/// scanned are not scanned again.
pub fn dependency_list(root: &Bundle) -> IndexMap<String, Dependency> {
    let mut list = IndexMap::new();
    let mut scanned = FxHashSet::default();
    collect(root, &mut list, &mut scanned);
    list
}

fn collect(
    bundle: &Bundle,
    list: &mut IndexMap<String, Dependency>,
    scanned: &mut FxHashSet<*const Bundle>,
) {
    for dependency in bundle.dependencies.values() {
        if !list.contains_key(dependency.name()) {
            list.insert(dependency.name().to_string(), dependency.clone());
        }
        if scanned.insert(Arc::as_ptr(&dependency.bundle)) {
            collect(&dependency.bundle, list, scanned);
        }
    }
}

/// Whether every dependency of `bundle` is already present in `ordered`.
///
/// A bundle without dependencies is always satisfied.
pub fn is_satisfied_by(bundle: &Bundle, ordered: &[Dependency]) -> bool {
    bundle
        .dependencies
        .keys()
        .all(|name| ordered.iter().any(|d| d.name() == name))
}

/// The candidates whose own dependencies are all present in `ordered`,
/// in candidate order.
pub fn satisfied_by<'a>(
    ordered: &[Dependency],
    candidates: impl IntoIterator<Item = &'a Dependency>,
) -> Vec<Dependency> {
    candidates
        .into_iter()
        .filter(|candidate| is_satisfied_by(&candidate.bundle, ordered))
        .cloned()
        .collect()
}

/// Dependencies of `root` in build order, using [`DEFAULT_RESOLUTION_LIMIT`].
pub fn sorted_dependencies(root: &Bundle) -> Result<Vec<Dependency>> {
    sorted_dependencies_with_limit(root, DEFAULT_RESOLUTION_LIMIT)
}

/// Dependencies of `root` in build order.
///
/// Every reachable bundle appears exactly once and after all of its own
/// dependencies. Within one pass bundles keep their discovery order.
///
/// # Errors
///
/// - [`Error::DependencyCycle`] if the name-level graph has a cycle
/// - [`Error::Unresolvable`] if ordering takes more than `limit` passes
pub fn sorted_dependencies_with_limit(root: &Bundle, limit: usize) -> Result<Vec<Dependency>> {
    let all = dependency_list(root);

    if let Some(chain) = find_cycle(&all) {
        return Err(Error::DependencyCycle(chain));
    }

    let mut sorted: Vec<Dependency> = Vec::with_capacity(all.len());
    let mut placed: FxHashSet<&str> = FxHashSet::default();
    let mut iterations = 0;

    while sorted.len() < all.len() {
        if iterations >= limit {
            return Err(Error::Unresolvable {
                resolved: sorted.len(),
                total: all.len(),
                iterations,
            });
        }
        iterations += 1;

        // The frontier is computed against what was ordered before this pass.
        let frontier: Vec<&Dependency> = all
            .values()
            .filter(|d| !placed.contains(d.name()))
            .filter(|d| {
                d.bundle
                    .dependencies
                    .keys()
                    .all(|name| placed.contains(name.as_str()))
            })
            .collect();

        trace!(pass = iterations, frontier = frontier.len(), "resolver pass");

        for dependency in frontier {
            placed.insert(dependency.name());
            sorted.push(dependency.clone());
        }
    }

    debug!(
        root = %root.name,
        dependencies = sorted.len(),
        passes = iterations,
        "resolved bundle dependencies"
    );

    Ok(sorted)
}
