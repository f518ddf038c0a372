//! Tool installation resource: presence probe + shell install command.
use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Output fragments that mean a failing install command actually left the
/// tool in a usable state. Some package managers exit non-zero when there is
/// nothing to do.
const ALREADY_OK_PATTERNS: [&str; 6] = [
    "already installed",
    "no applicable",
    "already exists",
    "no update available",
    "is already configured",
    // `dotnet nuget add source` on a source that is already registered
    "already been added",
];

/// A system tool that can be probed on `PATH` and installed via a shell
/// command.
#[derive(Debug)]
pub struct ToolResource<'a> {
    /// Display label, e.g. `"Neovim"` or `"Rust prerequisites"`.
    pub label: String,
    /// Binary name probed on `PATH`. `None` means the tool cannot be probed
    /// and its (idempotent) command is always run.
    pub probe: Option<String>,
    /// Shell command that installs the tool.
    pub command: String,
    executor: &'a dyn Executor,
}

impl<'a> ToolResource<'a> {
    /// Create a new tool resource.
    #[must_use]
    pub const fn new(
        label: String,
        probe: Option<String>,
        command: String,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            label,
            probe,
            command,
            executor,
        }
    }
}

impl Resource for ToolResource<'_> {
    fn description(&self) -> String {
        self.label.clone()
    }

    fn current_state(&self) -> Result<ResourceState> {
        match &self.probe {
            Some(binary) if self.executor.which(binary) => Ok(ResourceState::Correct),
            _ => Ok(ResourceState::Missing),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let result = self.executor.run_shell(&self.command)?;
        if result.success {
            return Ok(ResourceChange::Applied);
        }
        if result.timed_out {
            anyhow::bail!("timed out: {}", self.command);
        }
        let detail = result.detail();
        let lower = detail.to_lowercase();
        if ALREADY_OK_PATTERNS.iter().any(|p| lower.contains(p)) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        anyhow::bail!(
            "exit {}: {}",
            result.code.unwrap_or(-1),
            first_lines(&detail, 15)
        )
    }
}

/// Cap multi-line command output for error messages.
fn first_lines(s: &str, n: usize) -> String {
    s.lines().take(n).collect::<Vec<_>>().join("\n")
}
