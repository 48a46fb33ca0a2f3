//! Child process invocation contract

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{ExternalTool, PipelineError, ToolKind};

/// A fully built command line for one external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub tool: ToolKind,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
}

impl ToolCommand {
    /// Start a command for `tool`; the program is the tool's resolved path
    pub fn new(tool: &ExternalTool) -> Self {
        Self {
            tool: tool.kind(),
            program: tool.path().to_path_buf(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// True if `flag` appears verbatim in the argument list
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// Value following `flag` in the argument list, if any
    pub fn arg_after(&self, flag: &str) -> Option<&Path> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|idx| self.args.get(idx + 1))
            .map(Path::new)
    }

    /// Last positional argument
    pub fn last_arg(&self) -> Option<&Path> {
        self.args.last().map(Path::new)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Outcome of a finished child process, with leniently decoded streams
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external commands to completion
///
/// Each call blocks until the child has exited and its output is drained.
pub trait CommandRunner {
    /// Run `command`
    ///
    /// # Errors
    /// - `ToolLaunch` if the process could not be started
    /// - `ExternalToolFailure` if it exited with a non-zero status
    fn run(&self, command: &ToolCommand) -> Result<ProcessResult, PipelineError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &ToolCommand) -> Result<ProcessResult, PipelineError> {
        (**self).run(command)
    }
}
