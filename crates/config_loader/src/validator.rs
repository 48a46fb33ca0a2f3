//! Required-key validation
//!
//! Rules:
//! - all of `AUDIVERIS_EXE`, `MUSESCORE_EXE`, `JIANPU_QML` are present
//! - an empty value counts as absent
//! - every missing key is reported, not just the first

use std::path::PathBuf;

use contracts::{PipelineError, ToolPaths};

use crate::parser::ConfigMap;

/// Key holding the OMR engine executable
pub const OMR_ENGINE_KEY: &str = "AUDIVERIS_EXE";
/// Key holding the notation editor executable
pub const NOTATION_EDITOR_KEY: &str = "MUSESCORE_EXE";
/// Key holding the plugin script
pub const PLUGIN_KEY: &str = "JIANPU_QML";

/// All required keys, in report order
pub const REQUIRED_KEYS: [&str; 3] = [OMR_ENGINE_KEY, NOTATION_EDITOR_KEY, PLUGIN_KEY];

/// Check required keys and build `ToolPaths`
///
/// `origin` names the configuration source in the error.
pub fn validate(map: &ConfigMap, origin: &str) -> Result<ToolPaths, PipelineError> {
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| lookup(map, key).is_none())
        .map(|key| key.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::missing_configuration(missing, origin));
    }

    let path = |key: &str| PathBuf::from(lookup(map, key).unwrap_or_default());
    Ok(ToolPaths {
        omr_engine: path(OMR_ENGINE_KEY),
        notation_editor: path(NOTATION_EDITOR_KEY),
        plugin: path(PLUGIN_KEY),
    })
}

fn lookup<'a>(map: &'a ConfigMap, key: &str) -> Option<&'a str> {
    map.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
