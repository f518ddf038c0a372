//! External process execution.
//!
//! All package manager, git, and download invocations go through the
//! [`Executor`] trait so tests can substitute a scripted implementation and
//! assert call sequences without touching the real system.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result, bail};

/// Default timeout for registry-driven shell commands.
///
/// Package manager invocations can legitimately take minutes; expiry is
/// treated as a recoverable per-tool failure by the installer.
pub const DEFAULT_SHELL_TIMEOUT: Duration = Duration::from_secs(600);

/// Poll interval while waiting for a child process.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the command exited successfully (and did not time out).
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Whether the command was killed after exceeding the timeout.
    pub timed_out: bool,
}

impl ExecResult {
    /// Combined trimmed output, stderr first, for failure reporting.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut out = self.stderr.trim().to_string();
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(stdout);
        }
        out
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
            timed_out: false,
        }
    }
}

/// Capability interface for running external commands and probing `PATH`.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a program with arguments, failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a program with arguments, returning the result without failing
    /// on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be started at all.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a full shell command line (`sh -c` / `cmd /C`) with a timeout.
    ///
    /// Never fails on non-zero exit; a timed-out command is reported with
    /// `success = false` and `timed_out = true`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the shell itself cannot be started.
    fn run_shell(&self, command: &str) -> Result<ExecResult>;

    /// Run a program in a specific working directory, failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Check whether a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// Production [`Executor`] that runs real system commands.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    /// Timeout applied to [`Executor::run_shell`] invocations.
    shell_timeout: Duration,
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self {
            shell_timeout: DEFAULT_SHELL_TIMEOUT,
        }
    }
}

impl SystemExecutor {
    /// Create an executor with a custom shell-command timeout.
    #[must_use]
    pub const fn with_timeout(shell_timeout: Duration) -> Self {
        Self { shell_timeout }
    }
}

/// Execute a prepared command and fail on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        );
    }
    Ok(result)
}

/// Build the platform shell invocation for a full command line.
fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Spawn a thread that drains a pipe to completion.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn run_shell(&self, command: &str) -> Result<ExecResult> {
        tracing::debug!(command, "running shell command");
        let mut cmd = shell_command(command);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to start shell for: {command}"))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.shell_timeout;
        let mut timed_out = false;
        let status = loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("failed to wait for: {command}"))?
            {
                break status;
            }
            if Instant::now() >= deadline {
                timed_out = true;
                let _ = child.kill();
                break child
                    .wait()
                    .with_context(|| format!("failed to reap: {command}"))?;
            }
            std::thread::sleep(WAIT_POLL);
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        let result = ExecResult {
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).to_string(),
            success: status.success() && !timed_out,
            code: status.code(),
            timed_out,
        };
        tracing::debug!(
            success = result.success,
            code = result.code,
            timed_out,
            "shell command finished"
        );
        Ok(result)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        execute_checked(cmd, &format!("{program} in {}", dir.display()))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_echo() {
        let exec = SystemExecutor::default();
        #[cfg(windows)]
        let result = exec.run("cmd", &["/C", "echo", "hello"]).unwrap();
        #[cfg(not(windows))]
        let result = exec.run("echo", &["hello"]).unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_failure_is_error() {
        let exec = SystemExecutor::default();
        #[cfg(windows)]
        let result = exec.run("cmd", &["/C", "exit", "1"]);
        #[cfg(not(windows))]
        let result = exec.run("false", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn run_unchecked_failure_sets_flag() {
        let exec = SystemExecutor::default();
        #[cfg(windows)]
        let result = exec.run_unchecked("cmd", &["/C", "exit", "1"]).unwrap();
        #[cfg(not(windows))]
        let result = exec.run_unchecked("false", &[]).unwrap();
        assert!(!result.success);
    }

    #[test]
    fn run_shell_captures_output() {
        let exec = SystemExecutor::default();
        let result = exec.run_shell("echo shell-test").unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "shell-test");
        assert!(!result.timed_out);
    }

    #[test]
    fn run_shell_nonzero_is_not_an_error() {
        let exec = SystemExecutor::default();
        #[cfg(windows)]
        let result = exec.run_shell("exit /B 3").unwrap();
        #[cfg(not(windows))]
        let result = exec.run_shell("exit 3").unwrap();
        assert!(!result.success);
        assert_eq!(result.code, Some(3));
    }

    #[cfg(not(windows))]
    #[test]
    fn run_shell_times_out() {
        let exec = SystemExecutor::with_timeout(Duration::from_millis(100));
        let result = exec.run_shell("sleep 5").unwrap();
        assert!(result.timed_out);
        assert!(!result.success);
    }

    #[test]
    fn which_finds_known_program() {
        let exec = SystemExecutor::default();
        #[cfg(windows)]
        assert!(exec.which("cmd"));
        #[cfg(not(windows))]
        assert!(exec.which("sh"));
    }

    #[test]
    fn which_missing_program() {
        let exec = SystemExecutor::default();
        assert!(!exec.which("this-program-does-not-exist-12345"));
    }

    #[test]
    fn detail_combines_streams() {
        let result = ExecResult {
            stdout: "out\n".to_string(),
            stderr: "err\n".to_string(),
            success: false,
            code: Some(1),
            timed_out: false,
        };
        assert_eq!(result.detail(), "err\nout");
    }
}
