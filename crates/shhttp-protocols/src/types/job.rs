//! Job record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::executable::{ExecResult, Executable};
use super::id::validate_id;
use super::null_as_default;
use super::status::Status;
use super::unix_now;
use crate::error::{JobError, Result};

/// The unit of scheduling and persistence.
///
/// `executions` keeps submission order, which is also execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    /// Assigned by the store on first save unless supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub executions: Vec<ExecResult>,

    #[serde(default)]
    pub status: Status,

    /// Seconds since the epoch.
    #[serde(default)]
    pub created: i64,

    /// Seconds since the epoch.
    #[serde(default)]
    pub last_modified: i64,

    /// Keep running later steps after a step exits non-zero.
    #[serde(default)]
    pub ignore_errors: bool,
}

impl Job {
    /// Create a job running `executables` in order.
    pub fn new(executables: impl IntoIterator<Item = Executable>) -> Self {
        Self {
            executions: executables.into_iter().map(ExecResult::pending).collect(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Identifier, or `""` before the job has been saved.
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Move to `next`, refusing edges the state machine does not have.
    pub fn transition(&mut self, next: Status) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(JobError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Stamp `last_modified` with the current time.
    pub fn touch(&mut self) {
        self.last_modified = unix_now();
    }

    /// Strip identity, lifecycle and captured output, keeping the executables.
    ///
    /// Used both when storing a template and when instantiating one.
    pub fn into_blueprint(self) -> Job {
        Job {
            executions: self
                .executions
                .into_iter()
                .map(|r| ExecResult {
                    executable: r.executable,
                    ..Default::default()
                })
                .collect(),
            ignore_errors: self.ignore_errors,
            ..Default::default()
        }
    }

    /// Overlay `env` on every execution's environment, overriding on conflict.
    pub fn merge_env(&mut self, env: &BTreeMap<String, String>) {
        if env.is_empty() {
            return;
        }
        for exe in self.executions.iter_mut().filter_map(|r| r.executable.as_mut()) {
            exe.env
                .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    /// Number of executions the runner has filled in.
    pub fn populated_count(&self) -> usize {
        self.executions.iter().filter(|r| r.is_populated()).count()
    }

    pub fn validate(&self) -> Result<()> {
        // An empty id is treated as absent and replaced on save.
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            validate_id(id)?;
        }
        for (index, exe) in self
            .executions
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.executable.as_ref().map(|e| (i, e)))
        {
            exe.validate().map_err(|e| match e {
                JobError::Validation(msg) => {
                    JobError::Validation(format!("execution {}: {}", index, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
