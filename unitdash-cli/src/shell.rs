//! Shell-backed command runner.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use unitdash_core::runner::{Captured, CommandRunner, RunError};

/// Runs commands through `sh -c`, capturing stdout only.
///
/// Every call is bounded by the configured timeout; a timed-out command is
/// killed and reported as "ran, produced nothing", so the heuristics
/// degrade the same way they do for a missing tool. A timeout of zero
/// disables the bound.
pub struct ShellRunner {
    timeout: Option<Duration>,
}

impl ShellRunner {
    pub fn new(timeout_ms: u64) -> Self {
        let timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run_capturing(&self, command: &str) -> Result<Captured, RunError> {
        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunError::new(command, e.to_string()))?;

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(done) => done,
                // Dropping the timed-out future kills the child.
                Err(_) => return Ok(Captured::default()),
            },
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|e| RunError::new(command, e.to_string()))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(Captured {
            text,
            status: output.status.code(),
        })
    }

    async fn run_status(&self, command: &str) -> Result<i32, RunError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunError::new(command, e.to_string()))?;

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(done) => done,
                Err(_) => {
                    let _ = child.kill().await;
                    return Ok(-1);
                }
            },
            None => child.wait().await,
        };
        let status = waited.map_err(|e| RunError::new(command, e.to_string()))?;
        Ok(status.code().unwrap_or(-1))
    }
}
