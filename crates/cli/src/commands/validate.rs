//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::{ConfigLoader, NOTATION_EDITOR_KEY, OMR_ENGINE_KEY, PLUGIN_KEY};
use contracts::{ExternalTool, ToolKind, ToolPaths};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolStatus>,
}

#[derive(Serialize)]
struct ToolStatus {
    key: &'static str,
    path: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    match ConfigLoader::load_from_path(&args.config) {
        Ok(tools) => {
            let statuses = check_tools(&tools);
            let valid = statuses.iter().all(|s| s.exists);
            ValidationResult {
                valid,
                config_path,
                error: (!valid).then(|| "one or more configured paths do not exist".to_string()),
                tools: statuses,
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            tools: Vec::new(),
        },
    }
}

fn check_tools(tools: &ToolPaths) -> Vec<ToolStatus> {
    let tool_status = |key, kind, path: &std::path::Path| {
        let resolved = ExternalTool::resolve(kind, path).ok();
        ToolStatus {
            key,
            path: path.display().to_string(),
            exists: resolved.is_some(),
            resolved: resolved.map(|t| t.path().display().to_string()),
        }
    };

    vec![
        tool_status(OMR_ENGINE_KEY, ToolKind::OmrEngine, &tools.omr_engine),
        tool_status(
            NOTATION_EDITOR_KEY,
            ToolKind::NotationEditor,
            &tools.notation_editor,
        ),
        ToolStatus {
            key: PLUGIN_KEY,
            path: tools.plugin.display().to_string(),
            exists: tools.plugin.exists(),
            resolved: None,
        },
    ]
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }

    if !result.tools.is_empty() {
        println!();
        for tool in &result.tools {
            let mark = if tool.exists { "✓" } else { "✗" };
            match tool.resolved {
                Some(ref resolved) if *resolved != tool.path => {
                    println!("  {} {} = {} -> {}", mark, tool.key, tool.path, resolved)
                }
                _ => println!("  {} {} = {}", mark, tool.key, tool.path),
            }
        }
    }
}
