//! External tool identities and resolved locations

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Kind of external program driven by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Optical music recognition engine (Audiveris)
    OmrEngine,
    /// Notation editor running the transformation plugin (MuseScore)
    NotationEditor,
}

impl ToolKind {
    /// Human-readable label used in diagnostics
    pub fn label(self) -> &'static str {
        match self {
            Self::OmrEngine => "OMR engine",
            Self::NotationEditor => "notation editor",
        }
    }

    /// Executable name inside a macOS application bundle
    fn bundle_binary(self) -> &'static str {
        match self {
            Self::OmrEngine => "Audiveris",
            Self::NotationEditor => "mscore",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An external executable, resolved once per pipeline run
///
/// The path is absolute and was verified to exist when the value was built.
/// There is no way to change it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    kind: ToolKind,
    path: PathBuf,
}

impl ExternalTool {
    /// Resolve and verify a tool location
    ///
    /// macOS application bundles (`*.app`) are followed to the executable
    /// under `Contents/MacOS` when it exists.
    ///
    /// # Errors
    /// `InputNotFound` if the location does not exist.
    pub fn resolve(kind: ToolKind, path: &Path) -> Result<Self, PipelineError> {
        let path = absolute(path)?;
        if !path.exists() {
            return Err(PipelineError::input_not_found(kind.label(), path));
        }
        let path = normalize_bundle(kind, path);
        Ok(Self { kind, path })
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Raw tool and plugin locations, as given by the CLI or a config source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    pub omr_engine: PathBuf,
    pub notation_editor: PathBuf,
    pub plugin: PathBuf,
}

/// Make a path absolute without touching the filesystem
pub fn absolute(path: &Path) -> Result<PathBuf, PipelineError> {
    Ok(std::path::absolute(path)?)
}

fn normalize_bundle(kind: ToolKind, path: PathBuf) -> PathBuf {
    let is_bundle = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("app"));

    if is_bundle {
        let candidate = path
            .join("Contents")
            .join("MacOS")
            .join(kind.bundle_binary());
        if candidate.exists() {
            return candidate;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_missing_tool() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExternalTool::resolve(ToolKind::OmrEngine, &dir.path().join("audiveris"))
            .unwrap_err();
        match err {
            PipelineError::InputNotFound { label, path } => {
                assert_eq!(label, "OMR engine");
                assert!(path.ends_with("audiveris"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_existing_tool_is_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("mscore");
        fs::write(&exe, b"").unwrap();
        let tool = ExternalTool::resolve(ToolKind::NotationEditor, &exe).unwrap();
        assert!(tool.path().is_absolute());
        assert_eq!(tool.kind(), ToolKind::NotationEditor);
    }

    #[test]
    fn test_resolve_app_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Audiveris.app");
        let macos = bundle.join("Contents").join("MacOS");
        fs::create_dir_all(&macos).unwrap();
        fs::write(macos.join("Audiveris"), b"").unwrap();

        let tool = ExternalTool::resolve(ToolKind::OmrEngine, &bundle).unwrap();
        assert_eq!(tool.path(), macos.join("Audiveris"));
    }

    #[test]
    fn test_resolve_app_bundle_without_binary_keeps_path() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("MuseScore 4.app");
        fs::create_dir_all(&bundle).unwrap();

        let tool = ExternalTool::resolve(ToolKind::NotationEditor, &bundle).unwrap();
        assert_eq!(tool.path(), bundle);
    }
}
