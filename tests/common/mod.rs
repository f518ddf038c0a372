//! Shared test support: a scripted [`Executor`] for driving steps without
//! touching the real system.
#![allow(clippy::unwrap_used, dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use nvim_bootstrap::exec::{ExecResult, Executor};

/// Scripted executor: queued responses are returned in FIFO order, every
/// invocation is recorded, and `PATH` lookups answer from a fixed list.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<(bool, String)>>,
    on_path: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    /// Create an executor where exactly `on_path` binaries resolve.
    pub fn new<S: Into<String>>(on_path: impl IntoIterator<Item = S>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            on_path: on_path.into_iter().map(Into::into).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for the next executed command.
    #[must_use]
    pub fn respond(self, success: bool, stdout: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((success, stdout.to_string()));
        self
    }

    /// All commands executed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, call: String) -> Result<ExecResult> {
        self.calls.lock().unwrap().push(call);
        let (success, stdout) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((true, String::new()));
        Ok(ExecResult {
            stdout,
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
            timed_out: false,
        })
    }
}

impl Executor for ScriptedExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.next(format!("{program} {}", args.join(" ")))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.next(format!("{program} {}", args.join(" ")))
    }

    fn run_shell(&self, command: &str) -> Result<ExecResult> {
        self.next(command.to_string())
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.next(format!("{} {program} {}", dir.display(), args.join(" ")))
    }

    fn which(&self, program: &str) -> bool {
        self.on_path.iter().any(|p| p == program)
    }
}
