//! Notation editor job specification
//!
//! Wire format: a JSON array of job objects, each with `in`, `plugin` and `out`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One transformation job for the notation editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEntry {
    /// Exported notation file to open
    #[serde(rename = "in")]
    pub input: PathBuf,
    /// Plugin script to run on the opened score
    pub plugin: PathBuf,
    /// Files to export after the plugin ran, in order
    pub out: Vec<PathBuf>,
}

/// Ordered sequence of jobs, serialized as a bare JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobSpec {
    pub entries: Vec<JobEntry>,
}
