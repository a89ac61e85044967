//! Job lifecycle status.

use serde::{Deserialize, Serialize};

/// Job status.
///
/// ```text
/// Queued ──► InProgress ──► Done
///   │            │
///   └────────────┴────────► Failed
/// ```
///
/// Immediate submissions enter `InProgress` directly. `Done` and `Failed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Waiting for the queue worker.
    Queued,
    /// Executions are being run.
    InProgress,
    /// Every execution ran (or failures were ignored).
    Done,
    /// A step failed and the remaining steps were abandoned.
    Failed,
}

impl Default for Status {
    fn default() -> Self {
        Status::Queued
    }
}

impl Status {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Done | Status::Failed)
    }

    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition_to(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::Queued, Status::InProgress)
                | (Status::Queued, Status::Failed)
                | (Status::InProgress, Status::Done)
                | (Status::InProgress, Status::Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Queued => "QUEUED",
            Status::InProgress => "IN_PROGRESS",
            Status::Done => "DONE",
            Status::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
