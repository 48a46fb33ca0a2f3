//! # Config Loader
//!
//! Resolves the external tool locations the pipeline needs.
//!
//! Responsibilities:
//! - Parse key=value (`.env`) or flat TOML configuration sources
//! - Verify every required key is present, before any process is started
//! - Produce `ToolPaths`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let tools = ConfigLoader::load_from_path(Path::new(".env")).unwrap();
//! println!("OMR engine: {}", tools.omr_engine.display());
//! ```

mod parser;
mod validator;

pub use contracts::ToolPaths;
pub use parser::{ConfigFormat, ConfigMap};
pub use validator::{NOTATION_EDITOR_KEY, OMR_ENGINE_KEY, PLUGIN_KEY, REQUIRED_KEYS};

use contracts::PipelineError;
use std::path::Path;
use tracing::debug;

/// Configuration loader
///
/// Provides static methods to resolve tool locations from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load tool locations from a file
    ///
    /// A file that does not exist is an empty source, so every required key
    /// is reported missing.
    ///
    /// # Errors
    /// - File read failure
    /// - Parse failure (TOML only)
    /// - Missing required keys
    pub fn load_from_path(path: &Path) -> Result<ToolPaths, PipelineError> {
        let format = ConfigFormat::from_extension(path.extension().and_then(|e| e.to_str()));
        let content = Self::read_file(path)?;
        Self::resolve(&content, format, &path.display().to_string())
    }

    /// Load tool locations from a string
    ///
    /// # Errors
    /// - Parse failure (TOML only)
    /// - Missing required keys
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<ToolPaths, PipelineError> {
        Self::resolve(content, format, "<string>")
    }
}

impl ConfigLoader {
    fn read_file(path: &Path) -> Result<String, PipelineError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config source not found, treating as empty");
            return Ok(String::new());
        }
        Ok(std::fs::read_to_string(path)?)
    }

    fn resolve(
        content: &str,
        format: ConfigFormat,
        origin: &str,
    ) -> Result<ToolPaths, PipelineError> {
        let map = parser::parse(content, format)?;
        debug!(origin, keys = map.len(), "Config source parsed");
        validator::validate(&map, origin)
    }
}
