//! # Artifact Locator
//!
//! Finds the output file an external tool left under a directory, when the
//! tool does not report the file name itself.
//!
//! Selection rule: among files whose extension is in the requested class
//! (ASCII case-insensitive), the one with the latest modification time wins.
//! Entries are walked in sorted path order and the first candidate wins a
//! timestamp tie; callers must not depend on tie order.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use contracts::{
    ArtifactLocator, DirectoryListing, PipelineError, BOOK_EXTENSIONS, LISTING_SAMPLE_LIMIT,
};
use tracing::{debug, warn};

/// Locator using filesystem modification timestamps
#[derive(Debug, Clone, Copy, Default)]
pub struct NewestFileLocator;

impl NewestFileLocator {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactLocator for NewestFileLocator {
    fn find_newest(&self, root: &Path, extensions: &[&str]) -> Result<PathBuf, PipelineError> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        let mut candidates = 0usize;

        for path in walk(root)? {
            if !path.is_file() || !has_extension(&path, extensions) {
                continue;
            }
            candidates += 1;
            let modified = fs::metadata(&path)?.modified()?;
            let is_newer = newest.as_ref().is_none_or(|(best, _)| modified > *best);
            if is_newer {
                newest = Some((modified, path));
            }
        }

        match newest {
            Some((_, path)) => {
                debug!(root = %root.display(), candidates, found = %path.display(), "Artifact located");
                Ok(path)
            }
            None => Err(PipelineError::artifact_not_found(root, extensions)),
        }
    }

    fn find_newest_book(&self, root: &Path) -> Result<PathBuf, PipelineError> {
        self.find_newest(root, BOOK_EXTENSIONS).or_else(|err| {
            if !matches!(err, PipelineError::ArtifactNotFound { .. }) {
                return Err(err);
            }
            let listing = sample_listing(root)?;
            warn!(
                root = %root.display(),
                entries = listing.total,
                "No OMR book found, attaching directory listing"
            );
            Err(err.with_listing(listing))
        })
    }
}

/// Every entry under `root`, recursively, in sorted order per directory
///
/// A missing root yields no entries.
pub fn walk(root: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut out = Vec::new();
    if root.is_dir() {
        walk_into(root, &mut out)?;
    }
    Ok(out)
}

fn walk_into(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), PipelineError> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        let is_dir = fs::symlink_metadata(&path)?.is_dir();
        out.push(path.clone());
        if is_dir {
            walk_into(&path, out)?;
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn sample_listing(root: &Path) -> Result<DirectoryListing, PipelineError> {
    let all = walk(root)?;
    let total = all.len();
    let entries = all.into_iter().take(LISTING_SAMPLE_LIMIT).collect();
    Ok(DirectoryListing { entries, total })
}
