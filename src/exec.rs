//! Subprocess execution behind an injectable [`Executor`] trait.
//!
//! The synchronizer never shells out; only the installer does, and always
//! through this trait so install logic is unit-testable with a mock.

use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Raw exit code when available.
    pub code: Option<i32>,
}

impl ExecResult {
    /// The most useful diagnostic text: stderr when present, else stdout.
    #[must_use]
    pub fn detail(&self) -> String {
        let err = self.stderr.trim();
        if err.is_empty() {
            self.stdout.trim().to_string()
        } else {
            err.to_string()
        }
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Command execution interface (real system calls or a test mock).
pub trait Executor: Send + Sync {
    /// Run a command with captured output; non-zero exit is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the command could not be spawned.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with inherited stdio, for long-running installer
    /// commands whose output (and password prompts) should reach the user
    /// directly. Returns whether the process exited zero.
    ///
    /// # Errors
    ///
    /// Returns an error only if the command could not be spawned.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<bool>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`] and the `which` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<bool> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(status.success())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
