//! Configuration source parsing
//!
//! Supports key=value files (`.env` style, primary) and flat TOML tables.

use std::collections::BTreeMap;

use contracts::PipelineError;

/// Parsed key/value pairs, in key order
pub type ConfigMap = BTreeMap<String, String>;

/// Configuration source format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `KEY=value` lines (recommended)
    DotEnv,
    /// Flat TOML table of string values
    Toml,
}

impl ConfigFormat {
    /// Infer format from file extension; anything but `.toml` is key=value
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(str::to_lowercase).as_deref() {
            Some("toml") => Self::Toml,
            _ => Self::DotEnv,
        }
    }
}

/// Parse key=value content
///
/// Blank lines, `#` comments and lines without `=` are skipped. Only the first
/// `=` splits; surrounding quote characters are stripped from the value.
/// Later duplicates win.
pub fn parse_dotenv(content: &str) -> ConfigMap {
    let mut map = ConfigMap::new();
    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        map.insert(key.trim().to_string(), value.to_string());
    }
    map
}

/// Parse a flat TOML table; every value must be a string
pub fn parse_toml(content: &str) -> Result<ConfigMap, PipelineError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| PipelineError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })?;

    let mut map = ConfigMap::new();
    for (key, value) in table {
        match value {
            toml::Value::String(s) => {
                map.insert(key, s);
            }
            other => {
                return Err(PipelineError::config_parse(format!(
                    "key '{key}' must be a string, got {}",
                    other.type_str()
                )));
            }
        }
    }
    Ok(map)
}

/// Parse content according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<ConfigMap, PipelineError> {
    match format {
        ConfigFormat::DotEnv => Ok(parse_dotenv(content)),
        ConfigFormat::Toml => parse_toml(content),
    }
}
