//! Shell profile management: vim alias and prompt initialisation.
//!
//! Every entry is marker-keyed: an existing line that starts with the marker
//! is rewritten in place, a matching line is left alone, and only a missing
//! entry is appended. The step is therefore idempotent across repeated runs
//! and never stacks duplicates in the profile.

use std::path::PathBuf;

use crate::exec::Executor;
use crate::logging::{Logger, Status};
use crate::platform::Platform;
use crate::resources::profile_entry::ProfileEntry;
use crate::resources::{Resource as _, ResourceChange, ResourceState};

/// Shell profile path for the platform.
///
/// Windows uses the current-user PowerShell 7 profile
/// (`Documents\PowerShell`, not the 5.1-era `WindowsPowerShell`), matching
/// the pwsh init line written into it; elsewhere the login shell decides
/// between `.zshrc` and `.bashrc`.
#[must_use]
pub fn profile_path(platform: &Platform) -> Option<PathBuf> {
    if platform.is_windows() {
        return dirs::document_dir()
            .map(|d| d.join("PowerShell").join("Microsoft.PowerShell_profile.ps1"));
    }
    let home = dirs::home_dir()?;
    let shell = std::env::var("SHELL").unwrap_or_default();
    if shell.ends_with("zsh") {
        Some(home.join(".zshrc"))
    } else {
        Some(home.join(".bashrc"))
    }
}

/// The managed entries for `profile`.
fn entries(platform: &Platform, profile: &PathBuf, executor: &dyn Executor) -> Vec<ProfileEntry> {
    let mut out = Vec::new();

    if platform.is_windows() {
        out.push(ProfileEntry::new(
            profile.clone(),
            "Set-Alias -Name vim".to_string(),
            "Set-Alias -Name vim -Value nvim".to_string(),
            "# Use Neovim for vim".to_string(),
        ));
        if executor.which("oh-my-posh") {
            out.push(ProfileEntry::new(
                profile.clone(),
                "oh-my-posh init".to_string(),
                "oh-my-posh init pwsh | Invoke-Expression".to_string(),
                "# Prompt".to_string(),
            ));
        }
    } else {
        out.push(ProfileEntry::new(
            profile.clone(),
            "alias vim=".to_string(),
            "alias vim='nvim'".to_string(),
            "# Use Neovim for vim".to_string(),
        ));
        if executor.which("oh-my-posh") {
            let shell_name = if profile.ends_with(".zshrc") { "zsh" } else { "bash" };
            out.push(ProfileEntry::new(
                profile.clone(),
                "eval \"$(oh-my-posh init".to_string(),
                format!("eval \"$(oh-my-posh init {shell_name})\""),
                "# Prompt".to_string(),
            ));
        }
    }

    out
}

/// Apply the shell profile entries for `platform` at the given profile path.
///
/// Exposed with an explicit `profile` so tests can point it at a temporary
/// file; [`run`] resolves the real profile first.
pub fn run_at(
    platform: &Platform,
    profile: &PathBuf,
    executor: &dyn Executor,
    log: &Logger,
    dry_run: bool,
) {
    for entry in entries(platform, profile, executor) {
        let description = entry.description();
        let state = match entry.current_state() {
            Ok(state) => state,
            Err(e) => {
                log.warn(&format!("{description}: {e:#}"));
                log.record(&description, Status::Failed, Some(&format!("{e:#}")));
                continue;
            }
        };

        if state == ResourceState::Correct {
            log.info(&format!("{description}: already configured"));
            log.record(&description, Status::AlreadyPresent, None);
            continue;
        }

        if dry_run {
            let verb = match state {
                ResourceState::Missing => "append",
                _ => "update",
            };
            log.dry_run(&format!("{verb} {}: {}", entry.marker, entry.line));
            log.record(&description, Status::DryRun, None);
            continue;
        }

        match entry.apply() {
            Ok(ResourceChange::Applied) => {
                log.info(&format!("configured {description}"));
                log.record(&description, Status::Ok, None);
            }
            Ok(ResourceChange::AlreadyCorrect) => {
                log.record(&description, Status::AlreadyPresent, None);
            }
            Err(e) => {
                log.warn(&format!("{description}: {e:#}"));
                log.record(&description, Status::Failed, Some(&format!("{e:#}")));
            }
        }
    }
}

/// Apply the shell profile entries for the detected platform.
pub fn run(platform: &Platform, executor: &dyn Executor, log: &Logger, dry_run: bool) {
    let Some(profile) = profile_path(platform) else {
        log.warn("cannot determine shell profile path; skipping alias setup");
        log.record("shell profile", Status::Skipped, Some("no home directory"));
        return;
    };
    run_at(platform, &profile, executor, log, dry_run);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::platform::{Os, PackageManager};
    use crate::resources::test_helpers::MockExecutor;

    fn linux() -> Platform {
        Platform::new(Os::Linux, Some(PackageManager::Apt))
    }

    #[test]
    fn alias_is_appended_once() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bashrc");
        let exec = MockExecutor::with_which(false);
        let log = Logger::new(false);

        run_at(&linux(), &profile, &exec, &log, false);
        run_at(&linux(), &profile, &exec, &log, false);

        let content = std::fs::read_to_string(&profile).unwrap();
        assert_eq!(content.matches("alias vim='nvim'").count(), 1);
    }

    #[test]
    fn stale_alias_is_replaced_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bashrc");
        std::fs::write(&profile, "alias vim='vi'\nexport LANG=C\n").unwrap();
        let exec = MockExecutor::with_which(false);
        let log = Logger::new(false);

        run_at(&linux(), &profile, &exec, &log, false);

        let content = std::fs::read_to_string(&profile).unwrap();
        assert_eq!(content.matches("alias vim=").count(), 1);
        assert!(content.contains("alias vim='nvim'"));
        assert!(content.contains("export LANG=C"));
    }

    #[test]
    fn prompt_entry_only_when_oh_my_posh_present() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bashrc");
        let log = Logger::new(false);

        run_at(&linux(), &profile, &MockExecutor::with_which(false), &log, false);
        let without = std::fs::read_to_string(&profile).unwrap();
        assert!(!without.contains("oh-my-posh"));

        run_at(&linux(), &profile, &MockExecutor::with_which(true), &log, false);
        let with = std::fs::read_to_string(&profile).unwrap();
        assert!(with.contains("eval \"$(oh-my-posh init bash)\""));
    }

    #[test]
    fn dry_run_leaves_profile_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bashrc");
        std::fs::write(&profile, "export LANG=C\n").unwrap();
        let exec = MockExecutor::with_which(true);
        let log = Logger::new(false);

        run_at(&linux(), &profile, &exec, &log, true);

        assert_eq!(
            std::fs::read_to_string(&profile).unwrap(),
            "export LANG=C\n"
        );
    }

    #[test]
    fn windows_profile_lives_in_the_pwsh_directory() {
        // pwsh reads Documents\PowerShell; Documents\WindowsPowerShell is
        // the 5.1 profile and would never see the pwsh init line.
        if let Some(path) = profile_path(&Platform::new(Os::Windows, None)) {
            assert!(path.ends_with("PowerShell/Microsoft.PowerShell_profile.ps1"));
            assert!(!path.to_string_lossy().contains("WindowsPowerShell"));
        }
    }

    #[test]
    fn windows_uses_powershell_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("Microsoft.PowerShell_profile.ps1");
        let exec = MockExecutor::with_which(true);
        let log = Logger::new(false);

        run_at(&Platform::new(Os::Windows, None), &profile, &exec, &log, false);

        let content = std::fs::read_to_string(&profile).unwrap();
        assert!(content.contains("Set-Alias -Name vim -Value nvim"));
        assert!(content.contains("oh-my-posh init pwsh | Invoke-Expression"));
    }
}
