//! Job error taxonomy.

use thiserror::Error;

use crate::types::Status;

/// Errors surfaced by job stores, the execution engine and the service facade.
///
/// A step exiting non-zero is not an error: it is recorded in the
/// [`ExecResult`](crate::ExecResult) and drives the status state machine.
#[derive(Debug, Error)]
pub enum JobError {
    /// Malformed job or executable description. Never retried.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Identifier absent from a store.
    #[error("Job not found: {0}")]
    NotFound(String),

    /// Underlying persistence failure (I/O, encoding, decoding).
    #[error("Store error: {0}")]
    Store(String),

    /// Attempt to move a job along an edge the state machine does not have.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: Status, to: Status },
}

impl JobError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, JobError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, JobError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, JobError>;
