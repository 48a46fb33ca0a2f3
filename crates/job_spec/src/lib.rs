//! # Job Spec Builder
//!
//! Builds the one-entry job the notation editor runs in batch mode
//! (`-j <job.json>`), and writes it to the wire format:
//!
//! ```text
//! [
//!   {
//!     "in": "<exported notation>",
//!     "plugin": "<plugin script>",
//!     "out": ["<final notation>", "<final pdf>"]
//!   }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{JobEntry, JobSpec, PipelineError};
use tracing::debug;

/// Build a job spec with exactly one entry
///
/// Pure: identical inputs give identical specs.
pub fn build(input: &Path, plugin: &Path, outputs: &[PathBuf]) -> JobSpec {
    JobSpec {
        entries: vec![JobEntry {
            input: input.to_path_buf(),
            plugin: plugin.to_path_buf(),
            out: outputs.to_vec(),
        }],
    }
}

/// Serialize to pretty-printed JSON (two-space indent)
pub fn to_json(spec: &JobSpec) -> Result<String, PipelineError> {
    Ok(serde_json::to_string_pretty(spec)?)
}

/// Write the job spec to `path` as UTF-8 JSON
pub fn write(spec: &JobSpec, path: &Path) -> Result<(), PipelineError> {
    let json = to_json(spec)?;
    fs::write(path, json.as_bytes())?;
    debug!(path = %path.display(), entries = spec.entries.len(), "Job spec written");
    Ok(())
}
