//! # Process Invoker
//!
//! Runs one external tool to completion with the current environment.
//!
//! Output is captured as raw bytes and decoded as UTF-8 with replacement
//! characters, since tools may write in whatever encoding the host console
//! uses. A non-zero exit status becomes `ExternalToolFailure` and is never
//! retried.

pub mod mock;

pub use mock::{MockConfig, MockRunner};

use std::process::{Command, Stdio};
use std::time::Instant;

use contracts::{CommandRunner, PipelineError, ProcessResult, ToolCommand};
use observability::{record_tool_invocation, Outcome};
use tracing::{debug, info, instrument};

/// `CommandRunner` backed by `std::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    #[instrument(skip_all, fields(tool = %command.tool))]
    fn run(&self, command: &ToolCommand) -> Result<ProcessResult, PipelineError> {
        let command_line = command.to_string();
        info!(command = %command_line, cwd = ?command.working_dir, "Running external tool");

        let started = Instant::now();
        let result = execute(command, &command_line);
        record_tool_invocation(command.tool, Outcome::from(&result), started.elapsed());
        result
    }
}

fn execute(command: &ToolCommand, command_line: &str) -> Result<ProcessResult, PipelineError> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &command.working_dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|source| PipelineError::ToolLaunch {
        command: command_line.to_string(),
        source,
    })?;

    let result = ProcessResult {
        exit_code: output.status.code(),
        stdout: decode_lossy(&output.stdout),
        stderr: decode_lossy(&output.stderr),
    };
    log_streams(&result);

    if !output.status.success() {
        return Err(PipelineError::ExternalToolFailure {
            command: command_line.to_string(),
            exit_code: result.exit_code,
        });
    }

    debug!(exit_code = ?result.exit_code, "External tool finished");
    Ok(result)
}

/// Decode bytes as UTF-8, substituting U+FFFD for invalid sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn log_streams(result: &ProcessResult) {
    if !result.stdout.trim().is_empty() {
        info!(stream = "stdout", "{}", result.stdout.trim_end());
    }
    if !result.stderr.trim().is_empty() {
        info!(stream = "stderr", "{}", result.stderr.trim_end());
    }
}
