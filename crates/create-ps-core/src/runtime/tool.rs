//! External program execution
//!
//! Runs the package manager and version control tools with captured output
//! and an upper bound on how long any single invocation may take.

use crate::collab::{CommandOutput, CommandRunner};
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Default bound on a single command
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// [`CommandRunner`] backed by tokio::process
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Human-readable command line, used in messages
    pub fn display_command(program: &str, args: &[String]) -> String {
        std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
        let cmd = Self::display_command(program, args);
        tracing::debug!(command = %cmd, cwd = %cwd.display(), "running");

        let child = TokioCommand::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::command(program, format!("could not start `{}`: {}", cmd, e)))?;

        // Dropping the future on timeout kills the child (kill_on_drop)
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(Error::command(
                    program,
                    format!("failed to wait for `{}`: {}", cmd, e),
                ))
            }
            Err(_) => {
                return Err(Error::command(
                    program,
                    format!(
                        "`{}` timed out after {} seconds",
                        cmd,
                        self.timeout.as_secs()
                    ),
                ))
            }
        };

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !result.success {
            tracing::debug!(
                command = %cmd,
                code = output.status.code().unwrap_or(-1),
                "command exited unsuccessfully"
            );
        }
        Ok(result)
    }
}
