//! Job store trait and in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use shhttp_protocols::{JobError, Job, Result, Status};

use crate::id::assign_id;

/// Keyed persistence for job records.
///
/// No per-record locking: concurrent writers to the same id are
/// last-write-wins.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist `job`, assigning an id if it has none, and return the id.
    ///
    /// A caller-supplied id is honoured and overwrites any existing record.
    async fn save_new_job(&self, job: &mut Job) -> Result<String>;

    /// Overwrite an existing record. Fails with `NotFound` if there is none.
    async fn update_job(&self, job: &Job) -> Result<()>;

    /// Load a record by id.
    async fn get_job(&self, id: &str) -> Result<Job>;

    /// Every id currently present, in no particular order.
    async fn list_ids(&self) -> Result<Vec<String>>;

    /// Remove a record. Fails with `NotFound` if there is none.
    async fn delete_job(&self, id: &str) -> Result<()>;

    /// Remove every record whose status is not `InProgress`.
    ///
    /// Best effort: records that cannot be read or removed are logged and
    /// skipped. Returns how many records were removed.
    async fn clear_finished(&self) -> Result<usize> {
        let mut removed = 0;
        for id in self.list_ids().await? {
            let job = match self.get_job(&id).await {
                Ok(job) => job,
                Err(e) => {
                    warn!(job_id = %id, error = %e, "Skipping unreadable record during sweep");
                    continue;
                }
            };
            if job.status == Status::InProgress {
                continue;
            }
            match self.delete_job(&id).await {
                Ok(()) => {
                    debug!(job_id = %id, status = %job.status, "Removed finished record");
                    removed += 1;
                }
                Err(e) => warn!(job_id = %id, error = %e, "Failed to remove finished record"),
            }
        }
        Ok(removed)
    }
}

/// Id an existing record must carry before it can be updated.
pub(crate) fn require_id(job: &Job) -> Result<&str> {
    match job.id.as_deref() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(JobError::Validation("job has no identifier".to_string())),
    }
}

/// In-memory job store, used in tests and for ephemeral runs.
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn save_new_job(&self, job: &mut Job) -> Result<String> {
        let id = assign_id(job)?;
        self.jobs.write().await.insert(id.clone(), job.clone());
        Ok(id)
    }

    async fn update_job(&self, job: &Job) -> Result<()> {
        let id = require_id(job)?;
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(existing) => {
                *existing = job.clone();
                Ok(())
            }
            None => Err(JobError::NotFound(id.to_string())),
        }
    }

    async fn get_job(&self, id: &str) -> Result<Job> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        Ok(self.jobs.read().await.keys().cloned().collect())
    }

    async fn delete_job(&self, id: &str) -> Result<()> {
        self.jobs
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
