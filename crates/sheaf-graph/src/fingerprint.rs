//! Structural fingerprints of bundle graphs.
//!
//! The fingerprint is the cache key for whole-tree compile memoization. It
//! is a BLAKE3 hash over the bundle's name, its debug flag, the fingerprints
//! of its references and the `(type, fingerprint)` pair of every dependency,
//! all in declaration order.

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::Bundle;

/// Content-addressed fingerprint of a bundle graph (BLAKE3 hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Bundle {
    /// Fingerprint of this bundle and everything reachable from it.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Hasher::new();

        hasher.update(self.name.as_bytes());
        hasher.update(b"\0");
        hasher.update(match self.debug {
            Some(true) => b"debug".as_slice(),
            Some(false) => b"prod".as_slice(),
            None => b"inherit".as_slice(),
        });

        for reference in self.references.values() {
            hasher.update(b"\0reference\0");
            hasher.update(reference.fingerprint().as_hex().as_bytes());
        }

        for dependency in self.dependencies.values() {
            hasher.update(b"\0dependency\0");
            hasher.update(dependency.edge.as_str().as_bytes());
            hasher.update(b"\0");
            hasher.update(dependency.bundle.fingerprint().as_hex().as_bytes());
        }

        Fingerprint(hasher.finalize().to_hex().to_string())
    }
}
