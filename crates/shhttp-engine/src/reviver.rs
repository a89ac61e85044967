//! Startup reconciliation of jobs left behind by a previous run.

use std::sync::Arc;

use tracing::{debug, info, warn};

use shhttp_protocols::{ExecResult, Job, Result, Status};
use shhttp_store::JobStore;

use crate::dispatcher::Dispatcher;

/// What a revival pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevivalReport {
    /// `InProgress` jobs restarted as immediate tasks.
    pub revived: usize,
    /// `Queued` jobs put back on the serial queue.
    pub requeued: usize,
    /// Non-terminal jobs marked `Failed` because revival is disabled.
    pub failed: usize,
    /// Jobs already `Done` or `Failed`.
    pub untouched: usize,
    /// Records that could not be read.
    pub unreadable: usize,
}

/// Scans the live-job store once and reconciles every non-terminal record.
///
/// No process survives a restart, so an `InProgress` record always means
/// the work was interrupted.
pub struct Reviver {
    store: Arc<dyn JobStore>,
    dispatcher: Arc<Dispatcher>,
}

impl Reviver {
    pub fn new(store: Arc<dyn JobStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Reconcile stale jobs.
    ///
    /// With `enabled`, interrupted jobs are rerun from their first step and
    /// queued jobs are re-enqueued in `(created, id)` order. Without it,
    /// both are marked `Failed` and nothing is executed.
    pub async fn revive(&self, enabled: bool) -> Result<RevivalReport> {
        let ids = self.store.list_ids().await?;
        let mut report = RevivalReport::default();
        let mut queued = Vec::new();

        for id in ids {
            let mut job = match self.store.get_job(&id).await {
                Ok(job) => job,
                Err(e) => {
                    warn!(job_id = %id, error = %e, "Skipping unreadable job during revival");
                    report.unreadable += 1;
                    continue;
                }
            };
            // The storage key is authoritative.
            job.id = Some(id);

            match job.status {
                Status::InProgress if enabled => {
                    debug!(job_id = %job.id_or_empty(), "Restarting interrupted job");
                    clear_results(&mut job);
                    self.dispatcher.spawn(job);
                    report.revived += 1;
                }
                Status::Queued if enabled => queued.push(job),
                Status::InProgress | Status::Queued => {
                    self.mark_failed(job).await;
                    report.failed += 1;
                }
                Status::Done | Status::Failed => report.untouched += 1,
            }
        }

        queued.sort_by(|a, b| {
            (a.created, a.id_or_empty()).cmp(&(b.created, b.id_or_empty()))
        });
        report.requeued = queued.len();
        for mut job in queued {
            clear_results(&mut job);
            self.dispatcher.enqueue(job);
        }

        info!(
            enabled,
            revived = report.revived,
            requeued = report.requeued,
            failed = report.failed,
            untouched = report.untouched,
            unreadable = report.unreadable,
            "Revival complete"
        );
        Ok(report)
    }

    async fn mark_failed(&self, mut job: Job) {
        let job_id = job.id_or_empty().to_string();
        if let Err(e) = job.transition(Status::Failed) {
            warn!(job_id = %job_id, error = %e, "Cannot fail stale job");
            return;
        }
        job.touch();
        match self.store.update_job(&job).await {
            Ok(()) => debug!(job_id = %job_id, "Marked stale job failed"),
            Err(e) => warn!(job_id = %job_id, error = %e, "Failed to persist stale job failure"),
        }
    }
}

/// Drop output captured by the interrupted run; the job restarts at step one.
fn clear_results(job: &mut Job) {
    for result in &mut job.executions {
        *result = ExecResult {
            executable: result.executable.take(),
            ..Default::default()
        };
    }
}

#[cfg(test)]
#[path = "reviver_tests.rs"]
mod tests;
