//! Config overlay: back up, obtain the base configuration, copy overrides.
//!
//! Ordering is the safety property here. The timestamped backup is created
//! before anything touches the destination, the base clone/update happens
//! next and aborts the whole step on failure, and only then are the override
//! files copied. An interrupt therefore leaves the filesystem in one of
//! three well-defined states: untouched, backed-up-not-yet-cloned, or fully
//! overlaid — never a half-copied overlay with no backup.

use std::path::{Path, PathBuf};

use crate::error::OverlayError;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::resources::fs::{copy_dir_recursive, is_empty_dir};

/// Upstream base configuration repository.
pub const BASE_REPO_URL: &str = "https://github.com/nvim-lua/kickstart.nvim.git";

/// Inputs for one overlay run.
#[derive(Debug, Clone)]
pub struct OverlayRequest {
    /// Destination configuration directory.
    pub destination: PathBuf,
    /// Directory holding this repository's override files.
    pub overlay_dir: PathBuf,
    /// Git URL of the base configuration.
    pub base_repo: String,
}

impl OverlayRequest {
    /// Request overlaying `overlay_dir` onto `destination` with the default
    /// base repository.
    #[must_use]
    pub fn new(destination: PathBuf, overlay_dir: PathBuf) -> Self {
        Self {
            destination,
            overlay_dir,
            base_repo: BASE_REPO_URL.to_string(),
        }
    }
}

/// How the base configuration was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseAction {
    /// Fresh clone into an absent or empty destination.
    Cloned,
    /// Existing checkout fast-forwarded.
    Updated,
    /// Existing non-git tree kept as-is.
    Kept,
}

/// Result of a completed overlay run.
#[derive(Debug, Clone)]
pub struct OverlayOutcome {
    /// Path of the timestamped backup that was created. `None` when the
    /// destination did not pre-exist, and always `None` in dry-run mode
    /// (the planned backup is only logged).
    pub backup: Option<PathBuf>,
    /// How the base configuration was obtained.
    pub base: BaseAction,
    /// Number of override files copied (or that would be copied, in
    /// dry-run mode).
    pub files_copied: usize,
}

/// Compute a collision-free backup path for `destination`.
///
/// Timestamps are UTC at second granularity; a numeric counter suffix
/// disambiguates the (unlikely) case of two backups in the same second.
fn backup_path(destination: &Path, now: chrono::DateTime<chrono::Utc>) -> PathBuf {
    let stamp = now.format("%Y%m%d_%H%M%S");
    let base = PathBuf::from(format!("{}.bak.{stamp}", destination.display()));
    if !base.exists() {
        return base;
    }
    let mut counter = 1u32;
    loop {
        let candidate = PathBuf::from(format!("{}.{counter}", base.display()));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Count the files a recursive copy of `dir` would transfer.
fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() { count_files(&path) } else { 1 }
        })
        .sum()
}

/// Run the overlay step.
///
/// # Errors
///
/// Fatal failures only: a backup that cannot be created, a clone/update of
/// the base configuration that fails (the backup stays intact and the
/// destination is not overlaid), or an override copy failure, reported with
/// the path that failed.
pub fn run(
    req: &OverlayRequest,
    executor: &dyn Executor,
    log: &Logger,
    dry_run: bool,
) -> Result<OverlayOutcome, OverlayError> {
    let dest = &req.destination;

    // Step 1: timestamped backup of any pre-existing destination.
    let dest_existed = dest.exists() && !is_empty_dir(dest);
    let mut backup = None;
    if dest_existed {
        let path = backup_path(dest, chrono::Utc::now());
        if dry_run {
            log.dry_run(&format!(
                "back up {} to {}",
                dest.display(),
                path.display()
            ));
        } else {
            log.info(&format!("backing up existing config to {}", path.display()));
            copy_dir_recursive(dest, &path).map_err(|source| OverlayError::Backup {
                path: dest.clone(),
                source,
            })?;
            backup = Some(path);
        }
    }

    // Step 2: obtain or update the base configuration. Failure here aborts
    // before any override is copied.
    let base = obtain_base(req, executor, log, dry_run)?;

    // Step 3: copy the override files, overrides winning on conflicts.
    let files_copied = if !req.overlay_dir.is_dir() {
        log.warn(&format!(
            "override directory {} not found; nothing to overlay",
            req.overlay_dir.display()
        ));
        0
    } else if dry_run {
        let count = count_files(&req.overlay_dir);
        log.dry_run(&format!(
            "copy {count} override files onto {}",
            dest.display()
        ));
        count
    } else {
        let count = copy_dir_recursive(&req.overlay_dir, dest).map_err(|source| {
            OverlayError::Copy {
                path: req.overlay_dir.clone(),
                source,
            }
        })?;
        log.info(&format!("copied {count} override files to {}", dest.display()));
        count
    };

    Ok(OverlayOutcome {
        backup,
        base,
        files_copied,
    })
}

/// Clone, update, or keep the base configuration at the destination.
fn obtain_base(
    req: &OverlayRequest,
    executor: &dyn Executor,
    log: &Logger,
    dry_run: bool,
) -> Result<BaseAction, OverlayError> {
    let dest = &req.destination;
    let dest_str = dest.display().to_string();

    if !dest.exists() || is_empty_dir(dest) {
        if dry_run {
            log.dry_run(&format!("git clone {} {dest_str}", req.base_repo));
            return Ok(BaseAction::Cloned);
        }
        log.info(&format!("cloning base configuration from {}", req.base_repo));
        let result = executor
            .run_unchecked("git", &["clone", &req.base_repo, &dest_str])
            .map_err(|e| OverlayError::CloneFailed {
                detail: format!("{e:#}"),
            })?;
        if !result.success {
            return Err(OverlayError::CloneFailed {
                detail: result.detail(),
            });
        }
        return Ok(BaseAction::Cloned);
    }

    if dest.join(".git").exists() {
        if dry_run {
            log.dry_run(&format!("git -C {dest_str} pull --ff-only"));
            return Ok(BaseAction::Updated);
        }
        log.info("updating base configuration");
        let result = executor
            .run_unchecked("git", &["-C", &dest_str, "pull", "--ff-only"])
            .map_err(|e| OverlayError::UpdateFailed {
                detail: format!("{e:#}"),
            })?;
        if !result.success {
            return Err(OverlayError::UpdateFailed {
                detail: result.detail(),
            });
        }
        return Ok(BaseAction::Updated);
    }

    // An existing non-git tree: treat it as the base rather than failing a
    // clone into a non-empty directory.
    log.info("existing configuration is not a git checkout; overlaying in place");
    Ok(BaseAction::Kept)
}
