//! The per-run install plan and its execution report.
//!
//! An [`InstallPlan`] is derived fresh from the registry, the core tool
//! table, and the detected platform; it is owned by the driver for the
//! duration of the run and never persisted.

use crate::config::{CoreTools, Registry};
use crate::platform::Platform;

/// Group name used for core (language-independent) tools.
pub const CORE_GROUP: &str = "core";

/// One concrete install action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInstall {
    /// Owning group: a language id, or [`CORE_GROUP`].
    pub group: String,
    /// Display label.
    pub label: String,
    /// Optional `PATH` probe binary; present tools are skipped.
    pub probe: Option<String>,
    /// Shell command to run.
    pub command: String,
}

/// The ordered sequence of install actions for the current platform.
#[derive(Debug, Clone, Default)]
pub struct InstallPlan {
    /// Actions in execution order.
    pub actions: Vec<PlannedInstall>,
}

impl InstallPlan {
    /// Derive the plan for `platform`: core tools first, then per-language
    /// prerequisites and system tools in registry order.
    ///
    /// Exactly the tools declared for the platform key appear — no extras,
    /// no omissions.
    #[must_use]
    pub fn build(registry: &Registry, core_tools: &CoreTools, platform: &Platform) -> Self {
        let key = platform.key();
        let mut actions = Vec::new();

        for tool in core_tools.for_platform(key) {
            actions.push(PlannedInstall {
                group: CORE_GROUP.to_string(),
                label: tool.name.clone(),
                probe: tool.probe.clone(),
                command: tool.command.clone(),
            });
        }

        for lang in registry.iter() {
            if let Some(command) = lang.prerequisites.get(key) {
                actions.push(PlannedInstall {
                    group: lang.id.clone(),
                    label: format!("{} prerequisites", lang.label),
                    probe: lang.probe.clone(),
                    command: command.clone(),
                });
            }
            // Setup commands run after the prerequisites so the toolchain
            // they configure is installed, and before the system tools that
            // depend on them.
            for step in &lang.setup {
                actions.push(PlannedInstall {
                    group: lang.id.clone(),
                    label: step.name.clone(),
                    probe: None,
                    command: step.command.clone(),
                });
            }
            for tool in &lang.system_tools {
                actions.push(PlannedInstall {
                    group: lang.id.clone(),
                    label: format!("{} ({})", tool.binary, lang.label),
                    probe: Some(tool.binary.clone()),
                    command: tool.command.clone(),
                });
            }
        }

        Self { actions }
    }

    /// Number of planned actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the plan is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Outcome of one planned action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Install command ran successfully.
    Installed,
    /// Probe found the tool; nothing was run.
    AlreadyPresent,
    /// Recorded without execution (`--dry-run`).
    Planned,
    /// Install command failed (recoverable).
    Failed {
        /// Failure description (exit code and trimmed output).
        detail: String,
    },
}

/// One entry of the install report.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    /// Owning group (language id or [`CORE_GROUP`]).
    pub group: String,
    /// Display label.
    pub label: String,
    /// What happened.
    pub status: ToolStatus,
}

/// Aggregate result of executing an [`InstallPlan`].
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Per-action outcomes, in execution order.
    pub outcomes: Vec<ToolOutcome>,
}

impl InstallReport {
    /// Record an outcome.
    pub fn push(&mut self, group: &str, label: &str, status: ToolStatus) {
        self.outcomes.push(ToolOutcome {
            group: group.to_string(),
            label: label.to_string(),
            status,
        });
    }

    /// Outcomes with [`ToolStatus::Failed`].
    pub fn failures(&self) -> impl Iterator<Item = &ToolOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ToolStatus::Failed { .. }))
    }

    /// Count outcomes matching a predicate.
    fn count(&self, pred: impl Fn(&ToolStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    /// Number of tools actually installed.
    #[must_use]
    pub fn installed(&self) -> usize {
        self.count(|s| *s == ToolStatus::Installed)
    }

    /// Number of tools skipped because they were already present.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| *s == ToolStatus::AlreadyPresent)
    }

    /// Number of failed tools.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ToolStatus::Failed { .. }))
    }

    /// Groups in which every attempted action failed.
    ///
    /// Per-tool failures are recoverable, but a group (language) where *all*
    /// tools failed makes the run exit non-zero.
    #[must_use]
    pub fn fully_failed_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for outcome in &self.outcomes {
            if !groups.contains(&outcome.group) {
                groups.push(outcome.group.clone());
            }
        }
        groups
            .into_iter()
            .filter(|g| {
                let of_group: Vec<_> = self
                    .outcomes
                    .iter()
                    .filter(|o| o.group == *g)
                    .collect();
                !of_group.is_empty()
                    && of_group
                        .iter()
                        .all(|o| matches!(o.status, ToolStatus::Failed { .. }))
            })
            .collect()
    }
}
