//! Unified error definitions
//!
//! Categorized by source: input / config / process / artifact / output.
//! Every variant is fatal to the pipeline run that raised it.

use std::path::PathBuf;

use thiserror::Error;

/// Number of directory entries kept in an `ArtifactNotFound` listing
pub const LISTING_SAMPLE_LIMIT: usize = 120;

/// Unified error type
#[derive(Debug, Error)]
pub enum PipelineError {
    // ===== Input Errors =====
    /// A required input file or tool location does not exist
    #[error("{label} not found: {}", .path.display())]
    InputNotFound { label: String, path: PathBuf },

    // ===== Configuration Errors =====
    /// One or more required configuration keys are absent or empty
    #[error("missing configuration keys [{}] (loaded from: {origin})", .keys.join(", "))]
    MissingConfiguration { keys: Vec<String>, origin: String },

    /// Configuration source could not be parsed
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Process Errors =====
    /// External tool exited with a non-zero status
    #[error("command failed with {}: {command}", describe_exit(.exit_code))]
    ExternalToolFailure {
        command: String,
        exit_code: Option<i32>,
    },

    /// External tool could not be started at all
    #[error("failed to launch command: {command}")]
    ToolLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // ===== Artifact Errors =====
    /// No file with a recognized extension exists under the searched root
    #[error(
        "no [{}] artifact found under {}{}",
        .extensions.join(", "),
        .root.display(),
        describe_listing(.listing)
    )]
    ArtifactNotFound {
        root: PathBuf,
        extensions: Vec<String>,
        /// Bounded sample of every entry found under `root`, with the total count
        listing: Option<DirectoryListing>,
    },

    // ===== Output Errors =====
    /// External tool reported success but a requested output is missing
    #[error("output not produced: {}", join_paths(.missing))]
    OutputNotProduced { missing: Vec<PathBuf> },

    /// Job spec could not be encoded
    #[error("job spec encode error: {0}")]
    JobSpecEncode(#[from] serde_json::Error),

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sample of a directory tree, attached to artifact lookup failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub entries: Vec<PathBuf>,
    pub total: usize,
}

impl PipelineError {
    /// Create input-not-found error
    pub fn input_not_found(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create missing-configuration error
    pub fn missing_configuration(keys: Vec<String>, origin: impl Into<String>) -> Self {
        Self::MissingConfiguration {
            keys,
            origin: origin.into(),
        }
    }

    /// Create artifact-not-found error
    pub fn artifact_not_found(root: impl Into<PathBuf>, extensions: &[&str]) -> Self {
        Self::ArtifactNotFound {
            root: root.into(),
            extensions: extensions.iter().map(|e| format!(".{e}")).collect(),
            listing: None,
        }
    }

    /// Attach a directory listing to an `ArtifactNotFound` error
    pub fn with_listing(self, listing: DirectoryListing) -> Self {
        match self {
            Self::ArtifactNotFound {
                root, extensions, ..
            } => Self::ArtifactNotFound {
                root,
                extensions,
                listing: Some(listing),
            },
            other => other,
        }
    }

    /// True for errors raised by a child process
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            Self::ExternalToolFailure { .. } | Self::ToolLaunch { .. }
        )
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

fn describe_listing(listing: &Option<DirectoryListing>) -> String {
    let Some(listing) = listing else {
        return String::new();
    };
    let mut out = format!("\nCreated files ({} total):", listing.total);
    for entry in &listing.entries {
        out.push('\n');
        out.push_str(&entry.display().to_string());
    }
    if listing.total > listing.entries.len() {
        out.push_str(&format!(
            "\n... {} more",
            listing.total - listing.entries.len()
        ));
    }
    out
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
