//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::ToolPaths;
use pipeline::{Pipeline, PipelineConfig, PipelineOptions, PipelinePlan};
use tracing::info;

use crate::cli::{EngineArgs, RunArgs};

/// Execute the `run` command
pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    let config = PipelineConfig {
        pdf_in: args.pdf_in.clone(),
        out_mxl: args.out_mxl.clone(),
        out_pdf: args.out_pdf.clone(),
        tools: ToolPaths {
            omr_engine: args.audiveris_exe.clone(),
            notation_editor: args.musescore_exe.clone(),
            plugin: args.plugin_qml.clone(),
        },
        options: pipeline_options(&args.engine),
    };

    if args.dry_run {
        let plan = Pipeline::new(config)
            .plan()
            .context("Input validation failed")?;
        info!("Dry run mode - inputs are valid, exiting");
        print_plan(&plan);
        return Ok(());
    }

    execute(config, args.engine.stats)
}

/// Run the pipeline and print the two output paths
pub(crate) fn execute(config: PipelineConfig, show_stats: bool) -> Result<()> {
    info!(pdf = %config.pdf_in.display(), "Starting pipeline...");

    let report = Pipeline::new(config)
        .run()
        .context("Pipeline execution failed")?;

    info!(
        branch = %report.export.branch,
        invocations = report.stats.invocations,
        duration_secs = report.stats.total.as_secs_f64(),
        "Pipeline completed successfully"
    );

    println!("MXL: {}", report.notation.path.display());
    println!("PDF: {}", report.pdf.path.display());

    if show_stats {
        report.stats.print_summary();
    }
    Ok(())
}

pub(crate) fn pipeline_options(engine: &EngineArgs) -> PipelineOptions {
    PipelineOptions {
        force: engine.force,
        no_opus: engine.no_opus,
        workspace_root: engine.workspace_root.clone(),
    }
}

/// Print planned commands for dry-run mode
fn print_plan(plan: &PipelinePlan) {
    println!("\n=== Pipeline Plan ===\n");
    println!("Inputs:");
    println!("  PDF: {}", plan.inputs.pdf_in.display());
    println!("  Plugin: {}", plan.inputs.plugin.display());
    println!("\nOutputs:");
    println!("  MXL: {}", plan.inputs.out_mxl.display());
    println!("  PDF: {}", plan.inputs.out_pdf.display());
    println!("\nCommands:");
    println!("  1. {}", plan.transcribe);
    println!("  2. {}  (only if step 1 exported nothing)", plan.export);
    println!("  3. {}", plan.notation_editor);
    println!();
}
