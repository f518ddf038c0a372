//! Config overlay behavior: backup safety, override precedence, dry-run.
#![allow(clippy::unwrap_used)]

mod common;

use std::path::Path;

use common::ScriptedExecutor;
use nvim_bootstrap::error::OverlayError;
use nvim_bootstrap::logging::Logger;
use nvim_bootstrap::steps::overlay::{self, BaseAction, OverlayRequest};

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn overrides_win_and_untouched_files_survive() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("nvim");
    write(&dest.join("init.lua"), "-- kickstart default");
    write(&dest.join("lua/kickstart/health.lua"), "-- untouched");
    write(&dest.join(".git/HEAD"), "ref: refs/heads/master");

    let overlay_dir = tmp.path().join("overrides");
    write(&overlay_dir.join("init.lua"), "-- customized");
    write(&overlay_dir.join("lua/custom/plugins/rust.lua"), "return {}");

    let exec = ScriptedExecutor::new(["git"]);
    let log = Logger::new(false);
    let req = OverlayRequest::new(dest.clone(), overlay_dir);

    let outcome = overlay::run(&req, &exec, &log, false).unwrap();

    assert_eq!(outcome.files_copied, 2);
    // Same relative path: the override version wins.
    assert_eq!(
        std::fs::read_to_string(dest.join("init.lua")).unwrap(),
        "-- customized"
    );
    // No override for this path: the base version survives.
    assert_eq!(
        std::fs::read_to_string(dest.join("lua/kickstart/health.lua")).unwrap(),
        "-- untouched"
    );

    // And the backup holds the pre-overlay state.
    let backup = outcome.backup.unwrap();
    assert_eq!(
        std::fs::read_to_string(backup.join("init.lua")).unwrap(),
        "-- kickstart default"
    );
}

#[test]
fn repeated_runs_produce_distinct_backups() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("nvim");
    write(&dest.join("init.lua"), "v1");
    write(&dest.join(".git/HEAD"), "ref");
    let overlay_dir = tmp.path().join("overrides");
    write(&overlay_dir.join("init.lua"), "v2");

    let exec = ScriptedExecutor::new(["git"]);
    let log = Logger::new(false);
    let req = OverlayRequest::new(dest, overlay_dir);

    let first = overlay::run(&req, &exec, &log, false).unwrap();
    let second = overlay::run(&req, &exec, &log, false).unwrap();

    let first_backup = first.backup.unwrap();
    let second_backup = second.backup.unwrap();
    assert_ne!(first_backup, second_backup);
    assert!(first_backup.exists());
    assert!(second_backup.exists());
    assert_eq!(
        std::fs::read_to_string(first_backup.join("init.lua")).unwrap(),
        "v1"
    );
    assert_eq!(
        std::fs::read_to_string(second_backup.join("init.lua")).unwrap(),
        "v2"
    );
}

#[test]
fn failed_clone_aborts_with_backup_preserved() {
    let tmp = tempfile::tempdir().unwrap();
    // Destination absent entirely: clone path, no backup.
    let dest = tmp.path().join("nvim");
    let overlay_dir = tmp.path().join("overrides");
    write(&overlay_dir.join("init.lua"), "-- customized");

    let exec = ScriptedExecutor::new(["git"]).respond(false, "fatal: could not resolve host");
    let log = Logger::new(false);
    let req = OverlayRequest::new(dest.clone(), overlay_dir);

    let err = overlay::run(&req, &exec, &log, false).unwrap_err();

    assert!(matches!(err, OverlayError::CloneFailed { .. }));
    assert!(
        !dest.join("init.lua").exists(),
        "overrides must not land without a base"
    );
}

#[test]
fn dry_run_reports_without_touching_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("nvim");
    write(&dest.join("init.lua"), "original");
    write(&dest.join(".git/HEAD"), "ref");
    let overlay_dir = tmp.path().join("overrides");
    write(&overlay_dir.join("init.lua"), "changed");

    let exec = ScriptedExecutor::new(["git"]);
    let log = Logger::new(false);
    let req = OverlayRequest::new(dest.clone(), overlay_dir);

    let outcome = overlay::run(&req, &exec, &log, true).unwrap();

    assert_eq!(outcome.base, BaseAction::Updated);
    assert_eq!(outcome.files_copied, 1);
    assert!(exec.calls().is_empty());
    assert!(outcome.backup.is_none(), "no backup is created in dry-run mode");
    assert_eq!(
        std::fs::read_to_string(dest.join("init.lua")).unwrap(),
        "original"
    );
}
