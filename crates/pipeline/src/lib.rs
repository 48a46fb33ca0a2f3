//! # Pipeline
//!
//! Turns a scanned score PDF into an edited notation file and a re-typeset
//! PDF by driving two external programs in sequence:
//!
//! 1. the OMR engine (transcription, plus an explicit export when needed)
//! 2. the notation editor running a plugin job
//!
//! Execution is single-threaded and blocking. Each child process has exited
//! and its output is drained before the next step starts. No timeout is
//! enforced on child processes.

mod orchestrator;
mod stats;
mod workspace;

pub use orchestrator::{
    editor_command, Pipeline, PipelineConfig, PipelineOptions, PipelinePlan, PipelineReport,
    ValidatedInputs,
};
pub use stats::PipelineStats;
pub use workspace::{Workspace, WORKSPACE_PREFIX};
