use std::fmt;

use contracts::Artifact;

/// States of the export strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportState {
    /// Engine has not transcribed the PDF yet
    AwaitTranscription,
    /// Transcription finished; an export may or may not exist
    AwaitExportDecision,
    /// No export after transcription; export explicitly from the book
    AwaitBookExport,
    Done(ExportOutcome),
}

/// Resolved export artifact and how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub artifact: Artifact,
    pub branch: ExportBranch,
}

/// Path taken through the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBranch {
    /// Transcription exported directly
    SinglePass,
    /// Explicit export from the project book
    TwoPass { book: Artifact },
}

impl ExportBranch {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            Self::SinglePass => "single_pass",
            Self::TwoPass { .. } => "two_pass",
        }
    }

    /// Number of OMR engine invocations the branch took
    pub fn engine_invocations(&self) -> u32 {
        match self {
            Self::SinglePass => 1,
            Self::TwoPass { .. } => 2,
        }
    }
}

impl fmt::Display for ExportBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinglePass => f.write_str("single-pass"),
            Self::TwoPass { book } => write!(f, "two-pass (book: {})", book.path.display()),
        }
    }
}
