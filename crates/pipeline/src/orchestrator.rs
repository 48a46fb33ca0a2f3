//! Pipeline controller - sequences the OMR engine and the notation editor.
//!
//! Every step is a hard precondition for the next; the first error unwinds
//! the whole run and the workspace is removed on the way out.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use artifact_locator::NewestFileLocator;
use contracts::{
    absolute, Artifact, ArtifactLocator, ArtifactRole, CommandRunner, ExternalTool,
    PipelineError, ToolCommand, ToolKind, ToolPaths,
};
use observability::{record_export_branch, record_pipeline_run, Outcome};
use omr_export::{
    export_command, transcribe_command, ExportOptions, ExportOutcome, OmrExportStrategy,
};
use process_invoker::SystemRunner;
use tracing::{info, instrument};

use crate::{PipelineStats, Workspace};

/// Optional behaviour of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Strict transcription (`-force`)
    pub force: bool,

    /// Do not bundle movements into one export unit
    pub no_opus: bool,

    /// Parent directory for the workspace (None = system temp dir)
    pub workspace_root: Option<PathBuf>,
}

impl PipelineOptions {
    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            force: self.force,
            use_opus: !self.no_opus,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Scanned score to recognize
    pub pdf_in: PathBuf,

    /// Final notation file written by the editor
    pub out_mxl: PathBuf,

    /// Final typeset PDF written by the editor
    pub out_pdf: PathBuf,

    /// Tool and plugin locations
    pub tools: ToolPaths,

    pub options: PipelineOptions,
}

/// Inputs after step 1: absolute, verified to exist
#[derive(Debug, Clone)]
pub struct ValidatedInputs {
    pub pdf_in: PathBuf,
    pub out_mxl: PathBuf,
    pub out_pdf: PathBuf,
    pub omr_engine: ExternalTool,
    pub notation_editor: ExternalTool,
    pub plugin: PathBuf,
}

/// Commands a run would issue, with placeholders for run-time paths
#[derive(Debug, Clone)]
pub struct PipelinePlan {
    pub transcribe: ToolCommand,
    /// Only issued when transcription produced no export
    pub export: ToolCommand,
    pub notation_editor: ToolCommand,
    pub inputs: ValidatedInputs,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub notation: Artifact,
    pub pdf: Artifact,
    pub export: ExportOutcome,
    pub stats: PipelineStats,
}

/// Main pipeline controller
pub struct Pipeline<R = SystemRunner, L = NewestFileLocator> {
    config: PipelineConfig,
    runner: R,
    locator: L,
}

impl Pipeline {
    /// Create a pipeline running real child processes
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_parts(config, SystemRunner::new(), NewestFileLocator::new())
    }
}

impl<R: CommandRunner, L: ArtifactLocator> Pipeline<R, L> {
    /// Create a pipeline with a custom runner and locator
    pub fn with_parts(config: PipelineConfig, runner: R, locator: L) -> Self {
        Self {
            config,
            runner,
            locator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Step 1: check the input PDF, the tools and the plugin exist
    pub fn validate(&self) -> Result<ValidatedInputs, PipelineError> {
        let config = &self.config;

        let pdf_in = absolute(&config.pdf_in)?;
        if !pdf_in.is_file() {
            return Err(PipelineError::input_not_found("PDF", pdf_in));
        }

        let omr_engine = ExternalTool::resolve(ToolKind::OmrEngine, &config.tools.omr_engine)?;
        let notation_editor =
            ExternalTool::resolve(ToolKind::NotationEditor, &config.tools.notation_editor)?;

        let plugin = absolute(&config.tools.plugin)?;
        if !plugin.exists() {
            return Err(PipelineError::input_not_found("plugin", plugin));
        }

        Ok(ValidatedInputs {
            pdf_in,
            out_mxl: absolute(&config.out_mxl)?,
            out_pdf: absolute(&config.out_pdf)?,
            omr_engine,
            notation_editor,
            plugin,
        })
    }

    /// Validate and describe the commands a run would issue, without side effects
    pub fn plan(&self) -> Result<PipelinePlan, PipelineError> {
        let inputs = self.validate()?;
        let workspace = Path::new("<workspace>");
        let output_dir = workspace.join("audiveris_out");
        let options = self.config.options.export_options();

        Ok(PipelinePlan {
            transcribe: transcribe_command(
                &inputs.omr_engine,
                &inputs.pdf_in,
                &output_dir,
                options,
            ),
            export: export_command(
                &inputs.omr_engine,
                Path::new("<book>"),
                &output_dir,
                options,
            ),
            notation_editor: editor_command(
                &inputs.notation_editor,
                &workspace.join("job.json"),
                workspace,
            ),
            inputs,
        })
    }

    /// Run the pipeline to completion
    #[instrument(skip_all, fields(pdf = %self.config.pdf_in.display()))]
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let started = Instant::now();
        let result = self.run_steps(started);
        record_pipeline_run(Outcome::from(&result), started.elapsed());
        result
    }

    fn run_steps(&self, started: Instant) -> Result<PipelineReport, PipelineError> {
        let mut stats = PipelineStats::default();

        // 1. Validate inputs
        let inputs = self.validate()?;
        stats.validation = started.elapsed();
        info!(
            pdf = %inputs.pdf_in.display(),
            omr_engine = %inputs.omr_engine.path().display(),
            notation_editor = %inputs.notation_editor.path().display(),
            plugin = %inputs.plugin.display(),
            "Inputs validated"
        );

        // 2. Output directories
        for out in [&inputs.out_mxl, &inputs.out_pdf] {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        // 3. Workspace, released on every return below
        let workspace = Workspace::acquire(self.config.options.workspace_root.as_deref())?;

        // 4. OMR export
        let step = Instant::now();
        let export = OmrExportStrategy::new(
            &inputs.omr_engine,
            &self.runner,
            &self.locator,
            &inputs.pdf_in,
            workspace.omr_output_dir(),
            self.config.options.export_options(),
        )
        .run()?;
        stats.omr_export = step.elapsed();
        stats.invocations += export.branch.engine_invocations();
        record_export_branch(export.branch.label());
        info!(
            branch = %export.branch,
            export = %export.artifact.path.display(),
            "OMR export resolved"
        );

        // 5. Job spec
        let job_path = workspace.job_spec_path();
        let spec = job_spec::build(
            &export.artifact.path,
            &inputs.plugin,
            &[inputs.out_mxl.clone(), inputs.out_pdf.clone()],
        );
        job_spec::write(&spec, &job_path)?;

        // 6. Notation editor
        let step = Instant::now();
        self.runner.run(&editor_command(
            &inputs.notation_editor,
            &job_path,
            workspace.path(),
        ))?;
        stats.notation_editor = step.elapsed();
        stats.invocations += 1;

        // 7. Final outputs
        let missing: Vec<PathBuf> = [&inputs.out_mxl, &inputs.out_pdf]
            .into_iter()
            .filter(|p| !p.is_file())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::OutputNotProduced { missing });
        }

        drop(workspace);
        stats.total = started.elapsed();

        // 8. Report
        info!(
            mxl = %inputs.out_mxl.display(),
            pdf = %inputs.out_pdf.display(),
            total_secs = stats.total.as_secs_f64(),
            "Pipeline completed"
        );
        Ok(PipelineReport {
            notation: Artifact::new(ArtifactRole::FinalNotation, inputs.out_mxl),
            pdf: Artifact::new(ArtifactRole::FinalPdf, inputs.out_pdf),
            export,
            stats,
        })
    }
}

/// `<editor> -j <job.json>`, run inside the workspace
pub fn editor_command(editor: &ExternalTool, job_spec: &Path, workspace: &Path) -> ToolCommand {
    ToolCommand::new(editor)
        .arg("-j")
        .arg(job_spec)
        .current_dir(workspace)
}
