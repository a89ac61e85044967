//! Command specifications and their captured outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::error::{JobError, Result};

/// A single command specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Executable {
    /// Program to run, or the first word of the shell line in shell mode.
    pub command: String,

    /// Arguments, passed verbatim unless `shell` is set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: Vec<String>,

    /// Working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,

    /// Payload fed to standard input. Empty means no stdin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,

    /// Interpret `command` and `args` as one `sh -c` line.
    #[serde(default)]
    pub shell: bool,

    /// Variables overlaid on the inherited environment.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, String>,
}

impl Executable {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<String>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The single line handed to `sh -c` in shell mode.
    pub fn shell_line(&self) -> String {
        let mut line = self.command.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Stdin payload, if there is anything to feed.
    pub fn stdin_payload(&self) -> Option<&str> {
        self.stdin.as_deref().filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(JobError::Validation("command must not be empty".to_string()));
        }
        for key in self.env.keys() {
            if key.is_empty() || key.contains('=') || key.contains('\0') {
                return Err(JobError::Validation(format!(
                    "invalid environment variable name '{}'",
                    key.escape_default()
                )));
            }
        }
        Ok(())
    }
}

/// One executed step: the executable plus what running it produced.
///
/// Created empty and populated once by the process runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<Executable>,

    #[serde(default)]
    pub stdout: String,

    #[serde(default)]
    pub stderr: String,

    #[serde(default)]
    pub exit_code: i32,

    /// Seconds since the epoch when the process was started.
    #[serde(default)]
    pub start: i64,

    /// Seconds since the epoch when the process finished.
    #[serde(default)]
    pub end: i64,
}

impl ExecResult {
    /// An unpopulated result for `executable`.
    pub fn pending(executable: Executable) -> Self {
        Self {
            executable: Some(executable),
            ..Default::default()
        }
    }

    /// Whether the runner has filled this result in.
    pub fn is_populated(&self) -> bool {
        self.start > 0
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
#[path = "executable_tests.rs"]
mod tests;
