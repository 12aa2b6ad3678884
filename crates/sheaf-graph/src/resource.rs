//! Compiled artifacts: one physical file, its public link and its mime kind.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The kind of content a [`Resource`] carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeKind {
    /// `application/javascript`
    Script,
    /// `text/css`
    Stylesheet,
    /// Any other mime type. Such resources can be linked but never merged.
    Other(String),
}

impl MimeKind {
    pub const SCRIPT: &'static str = "application/javascript";
    pub const STYLESHEET: &'static str = "text/css";

    /// Parse a mime type string.
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            Self::SCRIPT => Self::Script,
            Self::STYLESHEET => Self::Stylesheet,
            other => Self::Other(other.to_string()),
        }
    }

    /// The mime type string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Script => Self::SCRIPT,
            Self::Stylesheet => Self::STYLESHEET,
            Self::Other(mime) => mime,
        }
    }

    /// File extension of a merged (minified) artifact of this kind.
    ///
    /// `None` means there is no merge convention for the kind.
    pub fn merged_extension(&self) -> Option<&'static str> {
        match self {
            Self::Script => Some("min.js"),
            Self::Stylesheet => Some("min.css"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for MimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical compiled file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub mime: MimeKind,
    /// Absolute path of the file on disk
    pub file: PathBuf,
    /// URI to reference the file from a document
    pub link: String,
}

impl Resource {
    pub fn new(mime: MimeKind, file: impl Into<PathBuf>, link: impl Into<String>) -> Self {
        Self {
            mime,
            file: file.into(),
            link: link.into(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_round_trips_known_types() {
        assert_eq!(MimeKind::from_mime("application/javascript"), MimeKind::Script);
        assert_eq!(MimeKind::from_mime("text/css"), MimeKind::Stylesheet);
        assert_eq!(MimeKind::Stylesheet.as_str(), "text/css");
    }

    #[test]
    fn unknown_mime_has_no_merged_extension() {
        let kind = MimeKind::from_mime("image/png");
        assert_eq!(kind, MimeKind::Other("image/png".to_string()));
        assert_eq!(kind.merged_extension(), None);
        assert_eq!(MimeKind::Script.merged_extension(), Some("min.js"));
        assert_eq!(MimeKind::Stylesheet.merged_extension(), Some("min.css"));
    }
}
