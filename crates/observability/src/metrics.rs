//! Pipeline metrics
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder.

use std::time::Duration;

use contracts::ToolKind;
use metrics::{counter, histogram};

/// Outcome label of a run or an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl<T, E> From<&Result<T, E>> for Outcome {
    fn from(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

fn tool_label(tool: ToolKind) -> &'static str {
    match tool {
        ToolKind::OmrEngine => "omr_engine",
        ToolKind::NotationEditor => "notation_editor",
    }
}

/// Record one finished external tool invocation
pub fn record_tool_invocation(tool: ToolKind, outcome: Outcome, elapsed: Duration) {
    counter!(
        "omr_pipeline_tool_invocations_total",
        "tool" => tool_label(tool),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!("omr_pipeline_tool_duration_seconds", "tool" => tool_label(tool))
        .record(elapsed.as_secs_f64());
}

/// Record which OMR export branch a run took (`single_pass` / `two_pass`)
pub fn record_export_branch(branch: &'static str) {
    counter!("omr_pipeline_export_branch_total", "branch" => branch).increment(1);
}

/// Record a finished pipeline run
pub fn record_pipeline_run(outcome: Outcome, elapsed: Duration) {
    counter!("omr_pipeline_runs_total", "outcome" => outcome.as_str()).increment(1);
    histogram!("omr_pipeline_run_duration_seconds").record(elapsed.as_secs_f64());
}
