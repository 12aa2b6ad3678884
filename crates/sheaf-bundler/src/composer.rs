//! Build composition.
//!
//! Folds a bundle's own resources together with the already composed
//! output of its dependencies. Nodes are composed bottom-up in resolver
//! order, so every dependency's list is available by name when its
//! dependents are composed.
//!
//! A LINK edge (or any edge in debug mode) puts the dependency's list in
//! front of what the bundle has so far. A MERGE edge in production mode
//! fuses the dependency's flattened resources with the bundle's trailing
//! entry into one [`MergeGroup`] named after the bundle.

use rustc_hash::FxHashMap;
use sheaf_graph::{Bundle, DependencyType, Resource};
use tracing::trace;

use crate::artifact::{Artifact, MergeGroup, flatten};

/// Composed artifact lists, keyed by bundle name.
pub type Composed = FxHashMap<String, Vec<Artifact>>;

/// Compose `bundle` from its own resources and its dependencies' lists.
///
/// Edges are applied in declaration order. A dependency missing from
/// `composed` contributes nothing.
pub fn compose(bundle: &Bundle, own: Vec<Resource>, composed: &Composed, debug: bool) -> Vec<Artifact> {
    let mut artifacts: Vec<Artifact> = own.into_iter().map(Artifact::Resource).collect();

    for (name, dependency) in &bundle.dependencies {
        let upstream = composed.get(name).map(Vec::as_slice).unwrap_or_default();

        artifacts = match dependency.edge {
            DependencyType::Merge if !debug => merge_into(&bundle.name, artifacts, upstream),
            _ => link_into(artifacts, upstream),
        };
    }

    trace!(
        bundle = %bundle.name,
        entries = artifacts.len(),
        groups = artifacts.iter().filter(|a| a.is_group()).count(),
        "composed bundle"
    );

    artifacts
}

fn link_into(artifacts: Vec<Artifact>, upstream: &[Artifact]) -> Vec<Artifact> {
    let mut linked = Vec::with_capacity(upstream.len() + artifacts.len());
    linked.extend_from_slice(upstream);
    linked.extend(artifacts);
    linked
}

fn merge_into(name: &str, mut artifacts: Vec<Artifact>, upstream: &[Artifact]) -> Vec<Artifact> {
    let mut members = flatten(upstream);

    match artifacts.pop() {
        Some(Artifact::Resource(trailing)) => members.push(trailing),
        Some(Artifact::Group(mut group)) => {
            // the group's last resource stays last
            let last = group.resources.pop();
            members.append(&mut group.resources);
            members.extend(last);
        }
        None => {}
    }

    artifacts.push(Artifact::Group(MergeGroup::new(name, members)));
    artifacts
}
