//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// OMR Pipeline - scanned score PDF to edited notation and re-typeset PDF
#[derive(Parser, Debug)]
#[command(
    name = "omr-pipeline",
    author,
    version,
    about = "PDF -> Audiveris -> MuseScore plugin -> MXL + PDF",
    long_about = "Recognizes a scanned score with Audiveris, runs a MuseScore plugin on the\n\
                  exported MusicXML, and exports the result as MXL and PDF.\n\n\
                  Tool locations may come from flags, the environment, or a .env file."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "OMR_PIPELINE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "OMR_PIPELINE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline with explicit tool locations
    Run(RunArgs),

    /// Run the pipeline with tool locations from a config file
    Convert(ConvertArgs),

    /// Check a config file and the tool locations it names
    Validate(ValidateArgs),
}

/// Flags shared by `run` and `convert`
#[derive(Parser, Debug, Clone)]
pub struct EngineArgs {
    /// Strict transcription (Audiveris -force)
    #[arg(long)]
    pub force: bool,

    /// Disable the OPUS export option
    #[arg(long)]
    pub no_opus: bool,

    /// Directory to create the temporary workspace in
    #[arg(long, env = "OMR_PIPELINE_WORKSPACE_ROOT")]
    pub workspace_root: Option<PathBuf>,

    /// Print run statistics after success
    #[arg(long)]
    pub stats: bool,
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Input PDF path
    #[arg(long)]
    pub pdf_in: PathBuf,

    /// Output .mxl path
    #[arg(long)]
    pub out_mxl: PathBuf,

    /// Output .pdf path
    #[arg(long)]
    pub out_pdf: PathBuf,

    /// Path to the Audiveris executable
    #[arg(long, env = "AUDIVERIS_EXE")]
    pub audiveris_exe: PathBuf,

    /// Path to the MuseScore executable
    #[arg(long, env = "MUSESCORE_EXE")]
    pub musescore_exe: PathBuf,

    /// Path to the MuseScore plugin (.qml)
    #[arg(long, env = "JIANPU_QML")]
    pub plugin_qml: PathBuf,

    /// Validate inputs and print the planned commands without running them
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the `convert` command
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Input PDF path
    #[arg(long)]
    pub pdf_in: PathBuf,

    /// Directory for outputs
    #[arg(long, default_value = "output")]
    pub out_dir: PathBuf,

    /// Config file with AUDIVERIS_EXE, MUSESCORE_EXE and JIANPU_QML (key=value or .toml)
    #[arg(short, long, default_value = ".env", env = "OMR_PIPELINE_CONFIG")]
    pub config: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(short, long, default_value = ".env", env = "OMR_PIPELINE_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
