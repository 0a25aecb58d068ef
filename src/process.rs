//! External process capability
//!
//! Handlers that shell out (browser screenshots, image diffs, vim, epubcheck,
//! git) never touch `std::process` directly. They go through a
//! [`ProcessRunner`] carried by the handler context so tests can substitute a
//! fake.

use crate::error::SeError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of a finished external process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit status; -1 if the process was killed by a signal
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// stdout followed by stderr, trimmed
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr).trim().to_string()
    }
}

/// Capability to locate and run external programs
pub trait ProcessRunner {
    /// Locate `name` on the search path
    fn which(&self, name: &str) -> Option<PathBuf>;

    /// Run to completion, capturing stdout and stderr
    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput>;

    /// Run attached to the current terminal and return the exit status
    fn run_interactive(&self, program: &Path, args: &[OsString]) -> std::io::Result<i32>;

    /// Whether a process with this exact name is currently running
    fn is_running(&self, name: &str) -> bool;
}

/// [`ProcessRunner`] backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn which(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput> {
        debug!(program = %program.display(), ?args, "running external process");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(ProcessOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_interactive(&self, program: &Path, args: &[OsString]) -> std::io::Result<i32> {
        debug!(program = %program.display(), ?args, "running interactive process");
        let status = Command::new(program).args(args).status()?;
        Ok(status.code().unwrap_or(-1))
    }

    fn is_running(&self, name: &str) -> bool {
        // pgrep exits 0 when at least one process matched
        let Some(pgrep) = self.which("pgrep") else {
            return false;
        };
        self.run(&pgrep, &["-x".into(), name.into()])
            .map(|output| output.success())
            .unwrap_or(false)
    }
}

/// Locate a required binary, failing with a missing-dependency error
pub fn require(runner: &dyn ProcessRunner, name: &str) -> Result<PathBuf, SeError> {
    runner.which(name).ok_or_else(|| {
        SeError::MissingDependency(format!("Couldn’t locate {}. Is it installed?", name))
    })
}

/// Build an argument vector from anything string-like
pub fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    items.into_iter().map(Into::into).collect()
}
