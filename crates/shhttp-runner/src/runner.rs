//! Process execution.

use std::process::{ExitStatus, Output, Stdio};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use shhttp_protocols::{unix_now, ExecResult, Executable};

/// Runs one executable and reports what happened.
///
/// Failing to start a process is not an error here: it is reported inside
/// the returned [`ExecResult`] with exit code 1.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, executable: &Executable) -> ExecResult;
}

/// Runner backed by real OS processes.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn build_command(executable: &Executable) -> Command {
        let mut cmd = if executable.shell {
            let mut c = Command::new("sh");
            c.arg("-c").arg(executable.shell_line());
            c
        } else {
            let mut c = Command::new(&executable.command);
            c.args(&executable.args);
            c
        };

        if let Some(dir) = executable.base_dir.as_deref().filter(|d| !d.is_empty()) {
            cmd.current_dir(dir);
        }

        // Inherited environment plus overrides.
        cmd.envs(&executable.env);

        let stdin = if executable.stdin_payload().is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        cmd.stdin(stdin).stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd
    }

    async fn spawn_and_wait(executable: &Executable) -> Result<Output, String> {
        let mut cmd = Self::build_command(executable);
        let mut child = cmd
            .spawn()
            .map_err(|e| format!("failed to start '{}': {}", executable.command, e))?;

        // Feed stdin from its own task so a chatty child can't fill its
        // output pipes while we are still writing.
        let writer = match (child.stdin.take(), executable.stdin_payload()) {
            (Some(mut stdin), Some(payload)) => {
                let payload = payload.to_owned();
                Some(tokio::spawn(async move {
                    if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                        debug!(error = %e, "child closed stdin before reading all input");
                    }
                }))
            }
            _ => None,
        };

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("failed to wait for '{}': {}", executable.command, e))?;

        if let Some(writer) = writer {
            let _ = writer.await;
        }

        Ok(output)
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn run(&self, executable: &Executable) -> ExecResult {
        let mut result = ExecResult::pending(executable.clone());

        debug!(
            command = %executable.command,
            args = ?executable.args,
            shell = executable.shell,
            "starting process"
        );

        result.start = unix_now();
        match Self::spawn_and_wait(executable).await {
            Ok(output) => {
                result.exit_code = exit_code(output.status);
                result.stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                result.stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            }
            Err(message) => {
                warn!(command = %executable.command, error = %message, "process could not be run");
                result.exit_code = 1;
                result.stderr = message;
            }
        }
        result.end = unix_now();

        debug!(
            command = %executable.command,
            exit_code = result.exit_code,
            "process finished"
        );

        result
    }
}

/// Exit status as an integer; `128 + signal` for signal deaths on Unix.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
