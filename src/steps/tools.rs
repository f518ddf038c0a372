//! Tool installer: drives an [`InstallPlan`] through [`ToolResource`]s.
use crate::exec::Executor;
use crate::logging::{Logger, Status};
use crate::plan::{InstallPlan, InstallReport, ToolStatus};
use crate::resources::tool::ToolResource;
use crate::resources::{Resource as _, ResourceChange, ResourceState};

/// Execute an install plan.
///
/// Already-present tools are skipped, dry-run records actions without
/// executing them, and a non-zero install command is a recoverable per-tool
/// failure: it is logged, the remaining tools are still attempted, and the
/// failure lands in the returned report. Running twice in an unchanged
/// environment therefore performs no redundant installation on the second
/// run.
pub fn run(
    plan: &InstallPlan,
    executor: &dyn Executor,
    log: &Logger,
    dry_run: bool,
) -> InstallReport {
    let mut report = InstallReport::default();

    for action in &plan.actions {
        let tool = ToolResource::new(
            action.label.clone(),
            action.probe.clone(),
            action.command.clone(),
            executor,
        );

        if matches!(tool.current_state(), Ok(ResourceState::Correct)) {
            log.info(&format!("{}: already present", action.label));
            log.record(&action.label, Status::AlreadyPresent, None);
            report.push(&action.group, &action.label, ToolStatus::AlreadyPresent);
            continue;
        }

        if dry_run {
            log.dry_run(&format!("{}: {}", action.label, action.command));
            log.record(&action.label, Status::DryRun, None);
            report.push(&action.group, &action.label, ToolStatus::Planned);
            continue;
        }

        log.info(&format!("installing {}", action.label));
        match tool.apply() {
            Ok(ResourceChange::Applied) => {
                log.record(&action.label, Status::Ok, None);
                report.push(&action.group, &action.label, ToolStatus::Installed);
            }
            Ok(ResourceChange::AlreadyCorrect) => {
                log.info(&format!("{}: already configured", action.label));
                log.record(&action.label, Status::AlreadyPresent, None);
                report.push(&action.group, &action.label, ToolStatus::AlreadyPresent);
            }
            Err(e) => {
                // Recoverable: report and keep going with the next tool.
                let detail = format!("{e:#}");
                log.warn(&format!("{} failed: {detail}", action.label));
                log.record(&action.label, Status::Failed, Some(&detail));
                report.push(&action.group, &action.label, ToolStatus::Failed { detail });
            }
        }
    }

    report
}
