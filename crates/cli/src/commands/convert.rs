//! `convert` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::absolute;
use pipeline::PipelineConfig;
use tracing::info;

use super::run::{execute, pipeline_options};
use crate::cli::ConvertArgs;

/// Appended to the input's base name for both outputs
pub const OUTPUT_SUFFIX: &str = "_jianpu";

/// Execute the `convert` command
pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    info!(config = %args.config.display(), "Resolving tool locations");
    let tools = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let pdf_in = absolute(&args.pdf_in)?;
    if !pdf_in.is_file() {
        anyhow::bail!("PDF not found: {}", pdf_in.display());
    }

    let out_dir = absolute(&args.out_dir)?;
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let (out_mxl, out_pdf) = output_paths(&pdf_in, &out_dir)?;

    execute(
        PipelineConfig {
            pdf_in,
            out_mxl,
            out_pdf,
            tools,
            options: pipeline_options(&args.engine),
        },
        args.engine.stats,
    )
}

/// `<out_dir>/<stem>_jianpu.mxl` and `<out_dir>/<stem>_jianpu.pdf`
pub fn output_paths(pdf_in: &Path, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let stem = pdf_in
        .file_stem()
        .with_context(|| format!("Input has no file name: {}", pdf_in.display()))?
        .to_string_lossy();
    Ok((
        out_dir.join(format!("{stem}{OUTPUT_SUFFIX}.mxl")),
        out_dir.join(format!("{stem}{OUTPUT_SUFFIX}.pdf")),
    ))
}
