//! Nerd Font installation for Linux.
//!
//! The distribution package managers do not ship JetBrainsMono Nerd Font, so
//! it is fetched from the upstream release archive and unpacked into the
//! user font directory. Windows and macOS get the font through their core
//! tool entries instead.

use std::path::PathBuf;

use crate::exec::Executor;
use crate::logging::{Logger, Status};
use crate::plan::{CORE_GROUP, InstallReport, ToolStatus};
use crate::platform::Platform;

/// Display label used for logging and the report.
const LABEL: &str = "JetBrainsMono Nerd Font";

/// Font file probed to decide whether the font is already installed.
const FONT_FILE: &str = "JetBrainsMonoNerdFont-Regular.ttf";

/// Upstream release archive.
const FONT_URL: &str =
    "https://github.com/ryanoasis/nerd-fonts/releases/latest/download/JetBrainsMono.zip";

/// TCP connect timeout for the download, in seconds.
const CONNECT_TIMEOUT: u64 = 10;

/// Total transfer timeout for the download, in seconds.
const TRANSFER_TIMEOUT: u64 = 120;

/// User font directory (`~/.local/share/fonts`).
fn font_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".local").join("share").join("fonts"))
}

/// Download the font archive with curl or wget, whichever is available.
fn download(executor: &dyn Executor, dest: &str) -> Result<(), String> {
    let connect = CONNECT_TIMEOUT.to_string();
    let transfer = TRANSFER_TIMEOUT.to_string();

    let result = if executor.which("curl") {
        executor.run_unchecked(
            "curl",
            &[
                "-fLo",
                dest,
                "--connect-timeout",
                &connect,
                "--max-time",
                &transfer,
                FONT_URL,
            ],
        )
    } else if executor.which("wget") {
        executor.run_unchecked(
            "wget",
            &[
                "-qO",
                dest,
                &format!("--connect-timeout={connect}"),
                &format!("--timeout={transfer}"),
                FONT_URL,
            ],
        )
    } else {
        return Err("neither curl nor wget is available".to_string());
    };

    match result {
        Ok(r) if r.success => Ok(()),
        Ok(r) => Err(r.detail()),
        Err(e) => Err(format!("{e:#}")),
    }
}

/// Install the Nerd Font on Linux, recording the outcome in `report`.
///
/// Failures here are recoverable: the font is cosmetic, so a failed download
/// or unpack is logged and reported but never aborts the run.
pub fn install(
    platform: &Platform,
    executor: &dyn Executor,
    log: &Logger,
    dry_run: bool,
    report: &mut InstallReport,
) {
    if !platform.is_linux() {
        return;
    }
    let Some(font_dir) = font_dir() else {
        log.warn("cannot determine home directory; skipping font install");
        return;
    };

    if font_dir.join(FONT_FILE).exists() {
        log.info(&format!("{LABEL}: already present"));
        log.record(LABEL, Status::AlreadyPresent, None);
        report.push(CORE_GROUP, LABEL, ToolStatus::AlreadyPresent);
        return;
    }

    if dry_run {
        log.dry_run(&format!("{LABEL}: download and unpack to {}", font_dir.display()));
        log.record(LABEL, Status::DryRun, None);
        report.push(CORE_GROUP, LABEL, ToolStatus::Planned);
        return;
    }

    log.info(&format!("installing {LABEL}"));
    let archive = std::env::temp_dir().join("JetBrainsMono.zip");
    let archive_str = archive.display().to_string();

    let outcome = std::fs::create_dir_all(&font_dir)
        .map_err(|e| format!("creating {}: {e}", font_dir.display()))
        .and_then(|()| download(executor, &archive_str))
        .and_then(|()| {
            let unzip = format!("unzip -o \"{archive_str}\" -d \"{}\"", font_dir.display());
            match executor.run_shell(&unzip) {
                Ok(r) if r.success => Ok(()),
                Ok(r) => Err(r.detail()),
                Err(e) => Err(format!("{e:#}")),
            }
        })
        .and_then(|()| {
            // Refresh the font cache; non-fatal if fc-cache is missing.
            if executor.which("fc-cache") {
                let _ = executor.run_unchecked("fc-cache", &["-f"]);
            }
            Ok(())
        });
    let _ = std::fs::remove_file(&archive);

    match outcome {
        Ok(()) => {
            log.record(LABEL, Status::Ok, None);
            report.push(CORE_GROUP, LABEL, ToolStatus::Installed);
        }
        Err(detail) => {
            log.warn(&format!("{LABEL} failed: {detail}"));
            log.record(LABEL, Status::Failed, Some(&detail));
            report.push(CORE_GROUP, LABEL, ToolStatus::Failed { detail });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Os;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn non_linux_platforms_are_skipped() {
        let exec = MockExecutor::with_which(true);
        let log = Logger::new(false);
        let mut report = InstallReport::default();
        install(
            &Platform::new(Os::Windows, None),
            &exec,
            &log,
            false,
            &mut report,
        );
        assert!(report.outcomes.is_empty());
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn dry_run_records_without_downloading() {
        if dirs::home_dir().is_none() {
            return;
        }
        let exec = MockExecutor::with_which(true);
        let log = Logger::new(false);
        let mut report = InstallReport::default();
        install(
            &Platform::new(Os::Linux, Some(crate::platform::PackageManager::Apt)),
            &exec,
            &log,
            true,
            &mut report,
        );
        assert!(exec.calls().is_empty());
        // Either already present on this machine or recorded as planned;
        // never a download in dry-run mode.
        assert_eq!(report.outcomes.len(), 1);
    }
}
