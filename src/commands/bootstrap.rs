//! The bootstrap command: the full environment setup sequence.
//!
//! Orchestrates platform detection, tool installation, the config overlay,
//! and shell setup. Per-tool failures are recoverable and only influence the
//! exit code when every tool of some group failed; a failed overlay aborts
//! immediately because a half-applied config is worse than no change.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use crate::cli::Cli;
use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::plan::InstallPlan;
use crate::platform::Platform;
use crate::steps;
use crate::steps::overlay::OverlayRequest;

/// Environment variable overriding the repository root.
pub const ROOT_ENV: &str = "NVIM_BOOTSTRAP_ROOT";

/// Locate the repository root holding `conf/` and the `nvim/` overlay.
///
/// Precedence: `--root`, then [`ROOT_ENV`], then the executable's directory
/// and its ancestors, then the working directory and its ancestors.
fn resolve_root(cli_root: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = cli_root {
        return Ok(root.to_path_buf());
    }
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }

    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        candidates.extend(dir.ancestors().map(Path::to_path_buf));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(cwd.ancestors().map(Path::to_path_buf));
    }
    candidates
        .into_iter()
        .find(|dir| dir.join("conf").is_dir() && dir.join("nvim").is_dir())
        .context("cannot locate the repository root; pass --root or set NVIM_BOOTSTRAP_ROOT")
}

/// Run the bootstrap sequence.
///
/// # Errors
///
/// Fatal conditions only: unknown platform, unreadable configuration, a
/// failed config overlay, or a language group in which every tool install
/// failed. Individual tool failures are reported in the summary instead.
pub fn run(cli: &Cli, executor: &dyn Executor, log: &Logger) -> Result<()> {
    let platform = Platform::detect()?;
    let root = resolve_root(cli.root.as_deref())?;
    let config = Config::load(&root)?;

    log.stage(&format!(
        "Bootstrapping Neovim environment ({}{})",
        platform.key(),
        if cli.dry_run { ", dry run" } else { "" },
    ));
    log.debug(&format!("repository root: {}", root.display()));

    let mut report = crate::plan::InstallReport::default();
    if cli.skip_tools {
        log.info("skipping tool installation (--skip-tools)");
    } else {
        log.stage("Installing tools");
        let plan = InstallPlan::build(&config.registry, &config.core_tools, &platform);
        report = steps::tools::run(&plan, executor, log, cli.dry_run);
        steps::fonts::install(&platform, executor, log, cli.dry_run, &mut report);
    }

    log.stage("Applying Neovim configuration");
    let request = OverlayRequest::new(platform.nvim_config_dir()?, config.overlay_dir());
    let outcome = steps::overlay::run(&request, executor, log, cli.dry_run)?;
    if let Some(backup) = &outcome.backup {
        log.info(&format!("previous config preserved at {}", backup.display()));
    }

    log.stage("Configuring shell");
    steps::shell::run(&platform, executor, log, cli.dry_run);

    log.print_summary();
    print_next_steps(&platform, log);

    let failed_groups = report.fully_failed_groups();
    if !failed_groups.is_empty() {
        bail!(
            "all tools failed for: {}; see the summary above",
            failed_groups.join(", ")
        );
    }
    Ok(())
}

/// Post-run hints that cannot be automated.
fn print_next_steps(platform: &Platform, log: &Logger) {
    log.stage("Next steps");
    log.info("1. Set your terminal font to 'JetBrainsMono Nerd Font'");
    log.info("2. Close and reopen your terminal (not just a new tab)");
    log.info("3. Run 'nvim'; plugins install automatically on first launch");
    log.info("4. Inside nvim, run ':checkhealth' to verify the setup");
    if platform.is_windows() {
        log.info("   (newly installed tools appear after a terminal restart)");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins() {
        let root = resolve_root(Some(Path::new("/tmp/explicit"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/explicit"));
    }

    #[test]
    fn repo_root_is_discoverable_from_manifest_dir() {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        assert!(manifest.join("conf").is_dir());
        assert!(manifest.join("nvim").is_dir());
    }
}
