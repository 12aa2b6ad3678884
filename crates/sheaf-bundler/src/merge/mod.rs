//! Merge & cache layer.
//!
//! Turns every [`MergeGroup`] left in a composed artifact list into one
//! physical file in the [`MergedFileStore`]. Which bundle kind merges a
//! group is decided by [`merge_strategy`].
//!
//! [`MergeGroup`]: crate::artifact::MergeGroup

mod key;
mod store;

pub use key::{ContentKey, content_key, merged_file_name};
pub use store::{MergedFileStore, StoreStats, WriteOutcome};

use std::path::PathBuf;
use std::sync::Arc;

use sheaf_graph::{BundleKind, MimeKind, Resource};
use tracing::debug;

use crate::artifact::Artifact;
use crate::{Error, Result};

/// The first kind in `kinds` able to merge `mime`.
pub fn merge_strategy<'a>(
    kinds: &'a [Arc<dyn BundleKind>],
    mime: &MimeKind,
) -> Option<&'a Arc<dyn BundleKind>> {
    kinds.iter().find(|kind| kind.can_merge(mime))
}

/// Replace every merge group in `artifacts` by its merged resource, in
/// place.
///
/// An empty group yields nothing.
///
/// # Errors
///
/// - [`Error::MixedMimeKinds`] if a group holds more than one mime kind
/// - [`Error::UnsupportedMimeKind`] if the kind has no merged file format
/// - [`Error::NoMergeStrategy`] if none of `kinds` can merge the group
pub fn compact(
    artifacts: Vec<Artifact>,
    kinds: &[Arc<dyn BundleKind>],
    store: &MergedFileStore,
    debug: bool,
) -> Result<Vec<Resource>> {
    let mut resources = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let group = match artifact {
            Artifact::Resource(resource) => {
                resources.push(resource);
                continue;
            }
            Artifact::Group(group) => group,
        };

        let mime = match group.mime_kind() {
            Ok(Some(mime)) => mime.clone(),
            Ok(None) => continue,
            Err(mixed) => {
                return Err(Error::MixedMimeKinds {
                    group: group.name.clone(),
                    kinds: mixed.iter().map(|k| k.to_string()).collect(),
                });
            }
        };

        if mime.merged_extension().is_none() {
            return Err(Error::UnsupportedMimeKind(mime));
        }

        let strategy = merge_strategy(kinds, &mime).ok_or_else(|| Error::NoMergeStrategy(mime.clone()))?;

        let files: Vec<PathBuf> = group.resources.iter().map(|r| r.file.clone()).collect();
        debug!(
            group = %group.name,
            kind = strategy.name(),
            mime = %mime,
            files = files.len(),
            "merging group"
        );

        let (resource, _) = store.ensure(&group.name, &mime, &files, |files| {
            strategy.merge_files(files, debug)
        })?;
        resources.push(resource);
    }

    Ok(resources)
}
