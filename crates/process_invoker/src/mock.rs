//! Mock command runner
//!
//! In-memory `CommandRunner` for tests: records every command, optionally
//! simulates the files a tool would write, and can inject failures.

use std::collections::HashMap;
use std::sync::Mutex;

use contracts::{CommandRunner, PipelineError, ProcessResult, ToolCommand, ToolKind};
use tracing::instrument;

/// Side effect simulating what a tool writes to disk
pub type RunHook = Box<dyn Fn(&ToolCommand) -> std::io::Result<()> + Send + Sync>;

/// Mock runner configuration
#[derive(Debug, Default, Clone)]
pub struct MockConfig {
    /// Tools that exit with the given non-zero code
    pub fail_tools: HashMap<ToolKind, i32>,
}

/// Mock command runner
#[derive(Default)]
pub struct MockRunner {
    config: MockConfig,
    hooks: Vec<(ToolKind, RunHook)>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl MockRunner {
    /// Runner where every tool succeeds without side effects
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            hooks: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `tool` exit with `code`
    pub fn failing(mut self, tool: ToolKind, code: i32) -> Self {
        self.config.fail_tools.insert(tool, code);
        self
    }

    /// Register a side effect run on each successful invocation of `tool`
    pub fn on_run(
        mut self,
        tool: ToolKind,
        hook: impl Fn(&ToolCommand) -> std::io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.push((tool, Box::new(hook)));
        self
    }

    /// All commands received so far, in order
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.lock_calls().clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<ToolCommand>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CommandRunner for MockRunner {
    #[instrument(name = "mock_run", skip_all, fields(tool = %command.tool))]
    fn run(&self, command: &ToolCommand) -> Result<ProcessResult, PipelineError> {
        self.lock_calls().push(command.clone());

        if let Some(&code) = self.config.fail_tools.get(&command.tool) {
            return Err(PipelineError::ExternalToolFailure {
                command: command.to_string(),
                exit_code: Some(code),
            });
        }

        for (tool, hook) in &self.hooks {
            if *tool == command.tool {
                hook(command)?;
            }
        }

        Ok(ProcessResult {
            exit_code: Some(0),
            ..Default::default()
        })
    }
}
