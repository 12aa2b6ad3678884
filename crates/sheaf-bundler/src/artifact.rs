//! Entries of a composed build: concrete resources and pending merge groups.

use serde::{Deserialize, Serialize};
use sheaf_graph::{MimeKind, Resource};

/// A named, ordered run of resources waiting to be merged into one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeGroup {
    /// Name of the bundle the group belongs to, used in the merged filename
    pub name: String,
    pub resources: Vec<Resource>,
}

impl MergeGroup {
    pub fn new(name: impl Into<String>, resources: Vec<Resource>) -> Self {
        Self {
            name: name.into(),
            resources,
        }
    }

    /// The single mime kind shared by every member, or the distinct kinds
    /// found when the group is mixed.
    pub fn mime_kind(&self) -> std::result::Result<Option<&MimeKind>, Vec<&MimeKind>> {
        let mut kinds: Vec<&MimeKind> = Vec::new();
        for resource in &self.resources {
            if !kinds.contains(&&resource.mime) {
                kinds.push(&resource.mime);
            }
        }

        match kinds.len() {
            0 => Ok(None),
            1 => Ok(kinds.pop()),
            _ => Err(kinds),
        }
    }
}

/// One entry of a composed artifact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Artifact {
    Resource(Resource),
    Group(MergeGroup),
}

impl Artifact {
    pub fn is_group(&self) -> bool {
        matches!(self, Artifact::Group(_))
    }
}

impl From<Resource> for Artifact {
    fn from(resource: Resource) -> Self {
        Artifact::Resource(resource)
    }
}

impl From<MergeGroup> for Artifact {
    fn from(group: MergeGroup) -> Self {
        Artifact::Group(group)
    }
}

/// Expand every merge group in place, keeping the overall order.
pub fn flatten(artifacts: &[Artifact]) -> Vec<Resource> {
    let mut resources = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match artifact {
            Artifact::Resource(resource) => resources.push(resource.clone()),
            Artifact::Group(group) => resources.extend(group.resources.iter().cloned()),
        }
    }
    resources
}
