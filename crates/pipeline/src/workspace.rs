//! Scoped temporary workspace
//!
//! Owned by exactly one pipeline run and removed when dropped, on every exit
//! path.

use std::fs;
use std::path::{Path, PathBuf};

use contracts::PipelineError;
use tempfile::TempDir;
use tracing::debug;

/// Name prefix of workspace directories
pub const WORKSPACE_PREFIX: &str = "omr_tmp_";

const OMR_OUTPUT_DIR: &str = "audiveris_out";
const JOB_SPEC_FILE: &str = "job.json";

/// Ephemeral directory tree for one pipeline run
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    omr_output_dir: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under `root`, or under the system temp dir
    ///
    /// The OMR output directory is created inside it.
    pub fn acquire(root: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        let omr_output_dir = dir.path().join(OMR_OUTPUT_DIR);
        fs::create_dir_all(&omr_output_dir)?;

        debug!(path = %dir.path().display(), "Workspace acquired");
        Ok(Self {
            dir,
            omr_output_dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the OMR engine writes into
    pub fn omr_output_dir(&self) -> &Path {
        &self.omr_output_dir
    }

    /// Location of the persisted job spec
    pub fn job_spec_path(&self) -> PathBuf {
        self.dir.path().join(JOB_SPEC_FILE)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        debug!(path = %self.dir.path().display(), "Releasing workspace");
    }
}
