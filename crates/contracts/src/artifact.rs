//! Artifacts produced by external tools, and the lookup seam used to find them

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Extensions of an exported notation file
pub const EXPORT_EXTENSIONS: &[&str] = &["mxl", "musicxml", "xml"];

/// Extensions of an OMR project book
pub const BOOK_EXTENSIONS: &[&str] = &["omr"];

/// Logical role of an artifact within one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactRole {
    OmrBook,
    OmrExport,
    FinalNotation,
    FinalPdf,
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OmrBook => "omr-book",
            Self::OmrExport => "omr-export",
            Self::FinalNotation => "final-notation",
            Self::FinalPdf => "final-pdf",
        };
        f.write_str(s)
    }
}

/// A file produced by an external tool
///
/// The pipeline never authors artifact contents; it only locates and references them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub role: ArtifactRole,
    pub path: PathBuf,
}

impl Artifact {
    pub fn new(role: ArtifactRole, path: impl Into<PathBuf>) -> Self {
        Self {
            role,
            path: path.into(),
        }
    }
}

/// Locates output artifacts left behind by an external tool
///
/// Implementations decide which file is "the" output among everything the
/// tool wrote under `root`.
pub trait ArtifactLocator {
    /// Find the most relevant file under `root` with one of `extensions`
    ///
    /// # Errors
    /// `ArtifactNotFound` if there is no candidate.
    fn find_newest(&self, root: &Path, extensions: &[&str]) -> Result<PathBuf, PipelineError>;

    /// Find the OMR project book under `root`
    ///
    /// # Errors
    /// `ArtifactNotFound` carrying a directory listing if there is no book.
    fn find_newest_book(&self, root: &Path) -> Result<PathBuf, PipelineError>;
}
