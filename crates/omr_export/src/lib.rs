//! # OMR Export Strategy
//!
//! Drives the OMR engine until an exported notation file exists.
//!
//! Depending on version and configuration, the engine either exports during
//! transcription or only saves a project book. The strategy never assumes
//! which: it transcribes, looks for an export, and falls back to an explicit
//! export pass against the newest book.
//!
//! ```text
//! AwaitTranscription -> AwaitExportDecision -> Done            (single pass)
//!                                           -> AwaitBookExport -> Done  (two pass)
//! ```

mod state;

pub use state::{ExportBranch, ExportOutcome, ExportState};

use std::path::Path;

use contracts::{
    Artifact, ArtifactLocator, ArtifactRole, CommandRunner, ExternalTool, PipelineError,
    ToolCommand, EXPORT_EXTENSIONS,
};
use tracing::{info, instrument};

/// Engine option bundling every movement into one export unit
pub const USE_OPUS_OPTION: &str = "org.audiveris.omr.sheet.BookManager.useOpus=true";

/// Engine flags for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Pass `-force` to transcription
    pub force: bool,
    /// Pass the OPUS option to the explicit export pass
    pub use_opus: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            force: false,
            use_opus: true,
        }
    }
}

/// State machine resolving the exported notation artifact for one PDF
pub struct OmrExportStrategy<'a, R: ?Sized, L: ?Sized> {
    engine: &'a ExternalTool,
    runner: &'a R,
    locator: &'a L,
    pdf: &'a Path,
    output_dir: &'a Path,
    options: ExportOptions,
}

impl<'a, R, L> OmrExportStrategy<'a, R, L>
where
    R: CommandRunner + ?Sized,
    L: ArtifactLocator + ?Sized,
{
    pub fn new(
        engine: &'a ExternalTool,
        runner: &'a R,
        locator: &'a L,
        pdf: &'a Path,
        output_dir: &'a Path,
        options: ExportOptions,
    ) -> Self {
        Self {
            engine,
            runner,
            locator,
            pdf,
            output_dir,
            options,
        }
    }

    /// Run from `AwaitTranscription` to `Done`
    #[instrument(skip_all, fields(pdf = %self.pdf.display()))]
    pub fn run(&self) -> Result<ExportOutcome, PipelineError> {
        let mut state = ExportState::AwaitTranscription;
        loop {
            state = match self.step(state)? {
                ExportState::Done(outcome) => return Ok(outcome),
                next => next,
            };
        }
    }

    /// Advance one transition
    ///
    /// `Done` is terminal and returned unchanged.
    pub fn step(&self, state: ExportState) -> Result<ExportState, PipelineError> {
        match state {
            ExportState::AwaitTranscription => {
                self.runner.run(&transcribe_command(
                    self.engine,
                    self.pdf,
                    self.output_dir,
                    self.options,
                ))?;
                Ok(ExportState::AwaitExportDecision)
            }
            ExportState::AwaitExportDecision => {
                match self.locator.find_newest(self.output_dir, EXPORT_EXTENSIONS) {
                    Ok(path) => {
                        info!(export = %path.display(), "OMR export found (single-pass)");
                        Ok(ExportState::Done(ExportOutcome {
                            artifact: Artifact::new(ArtifactRole::OmrExport, path),
                            branch: ExportBranch::SinglePass,
                        }))
                    }
                    Err(PipelineError::ArtifactNotFound { .. }) => {
                        Ok(ExportState::AwaitBookExport)
                    }
                    Err(other) => Err(other),
                }
            }
            ExportState::AwaitBookExport => {
                let book = self.locator.find_newest_book(self.output_dir)?;
                info!(book = %book.display(), "OMR book found");

                self.runner.run(&export_command(
                    self.engine,
                    &book,
                    self.output_dir,
                    self.options,
                ))?;

                let path = self
                    .locator
                    .find_newest(self.output_dir, EXPORT_EXTENSIONS)?;
                info!(export = %path.display(), "OMR export found (two-pass)");
                Ok(ExportState::Done(ExportOutcome {
                    artifact: Artifact::new(ArtifactRole::OmrExport, path),
                    branch: ExportBranch::TwoPass {
                        book: Artifact::new(ArtifactRole::OmrBook, book),
                    },
                }))
            }
            done @ ExportState::Done(_) => Ok(done),
        }
    }
}

/// `<engine> -batch -transcribe -output <dir> [-force] <pdf>`
pub fn transcribe_command(
    engine: &ExternalTool,
    pdf: &Path,
    output_dir: &Path,
    options: ExportOptions,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(engine)
        .args(["-batch", "-transcribe", "-output"])
        .arg(output_dir);
    if options.force {
        cmd = cmd.arg("-force");
    }
    cmd.arg(pdf)
}

/// `<engine> -batch -export -output <dir> [-option <opus>] <book>`
pub fn export_command(
    engine: &ExternalTool,
    book: &Path,
    output_dir: &Path,
    options: ExportOptions,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(engine)
        .args(["-batch", "-export", "-output"])
        .arg(output_dir);
    if options.use_opus {
        cmd = cmd.args(["-option", USE_OPUS_OPTION]);
    }
    cmd.arg(book)
}
