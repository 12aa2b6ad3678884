use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Bundle;

/// How a dependency's artifacts combine with the depending bundle's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Emit the dependency's artifacts before the bundle's own, as separate
    /// loadable units, in every mode.
    Link,
    /// In production mode fold the dependency's artifacts together with the
    /// bundle's trailing artifact into one physical file. Behaves like
    /// [`DependencyType::Link`] in debug mode.
    Merge,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Link => "link",
            DependencyType::Merge => "merge",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge from a bundle to one of its dependencies.
#[derive(Debug, Clone)]
pub struct Dependency {
    pub bundle: Arc<Bundle>,
    pub edge: DependencyType,
}

impl Dependency {
    pub fn new(bundle: impl Into<Arc<Bundle>>, edge: DependencyType) -> Self {
        Self {
            bundle: bundle.into(),
            edge,
        }
    }

    pub fn link(bundle: impl Into<Arc<Bundle>>) -> Self {
        Self::new(bundle, DependencyType::Link)
    }

    pub fn merge(bundle: impl Into<Arc<Bundle>>) -> Self {
        Self::new(bundle, DependencyType::Merge)
    }

    /// Name of the target bundle, the edge's key.
    pub fn name(&self) -> &str {
        &self.bundle.name
    }

    pub fn is_merge(&self) -> bool {
        self.edge == DependencyType::Merge
    }
}
