//! Subprocess invocation for the external text producers the statusline
//! reads (`git`, `hostname`, the host tool's `--version`).
//!
//! Every call is independent: it gets its own timeout, only stdout is
//! captured, and any failure (spawn error, non-zero exit, timeout) collapses
//! to `None` so callers can substitute a default for that one field.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use crate::error::Result;

/// Default per-call timeout for subprocesses.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Seam between the extractors and the operating system.
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd`.
    ///
    /// Returns stdout when the process exits successfully within the
    /// runner's timeout, `None` otherwise.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Option<String>;
}

/// Runs real processes, one at a time, on a single-threaded tokio runtime.
pub struct ProcessRunner {
    runtime: tokio::runtime::Runtime,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Option<String> {
        // Resolve up front so a missing binary costs a PATH scan, not a spawn.
        let program = which::which(program).ok()?;
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            // A timed-out child is killed when its future is dropped.
            .kill_on_drop(true);

        let output = self
            .runtime
            .block_on(async { tokio::time::timeout(self.timeout, cmd.output()).await })
            .ok()?
            .ok()?;

        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------
