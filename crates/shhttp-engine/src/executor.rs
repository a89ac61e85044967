//! Runs a single job to a terminal status.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use shhttp_protocols::{Job, Status};
use shhttp_runner::ProcessRunner;
use shhttp_store::JobStore;

/// Executes a job's steps in order through a [`ProcessRunner`].
///
/// The executor is the only writer of a job's record while it runs. Every
/// step is followed by a checkpoint so a crash leaves a durable trace of
/// how far the job got.
pub struct JobExecutor {
    runner: Arc<dyn ProcessRunner>,
    store: Arc<dyn JobStore>,
}

impl JobExecutor {
    pub fn new(runner: Arc<dyn ProcessRunner>, store: Arc<dyn JobStore>) -> Self {
        Self { runner, store }
    }

    /// Run `job` to completion and return its final state.
    ///
    /// A queued job is first moved to `InProgress`; a finished job is
    /// returned untouched. A step exiting non-zero
    /// fails the job and abandons the remaining steps unless
    /// `ignore_errors` is set.
    pub async fn execute(&self, mut job: Job) -> Job {
        let job_id = job.id_or_empty().to_string();

        if job.status.is_terminal() {
            warn!(job_id = %job_id, status = %job.status, "Job already finished, not running it");
            return job;
        }

        if job.status == Status::Queued {
            if let Err(e) = job.transition(Status::InProgress) {
                warn!(job_id = %job_id, error = %e, "Cannot start job");
                return job;
            }
            job.touch();
            self.checkpoint(&job).await;
        }

        debug!(job_id = %job_id, steps = job.executions.len(), "Executing job");

        let mut failed = false;
        for index in 0..job.executions.len() {
            let Some(executable) = job.executions[index].executable.clone() else {
                continue;
            };

            let result = self.runner.run(&executable).await;
            let exit_code = result.exit_code;
            job.executions[index] = result;
            job.touch();
            self.checkpoint(&job).await;

            if exit_code != 0 && !job.ignore_errors {
                debug!(job_id = %job_id, step = index, exit_code, "Step failed, abandoning job");
                failed = true;
                break;
            }
        }

        let terminal = if failed { Status::Failed } else { Status::Done };
        self.finish(&mut job, terminal).await;
        job
    }

    /// Best-effort write of intermediate progress.
    async fn checkpoint(&self, job: &Job) {
        match self.store.update_job(job).await {
            Ok(()) => debug!(job_id = %job.id_or_empty(), "Checkpoint written"),
            Err(e) => warn!(job_id = %job.id_or_empty(), error = %e, "Checkpoint write failed"),
        }
    }

    async fn finish(&self, job: &mut Job, terminal: Status) {
        if let Err(e) = job.transition(terminal) {
            warn!(job_id = %job.id_or_empty(), error = %e, "Cannot record terminal status");
            return;
        }
        job.touch();

        if let Err(e) = self.store.update_job(job).await {
            error!(job_id = %job.id_or_empty(), error = %e, "Failed to persist terminal status");
            return;
        }

        info!(
            job_id = %job.id_or_empty(),
            status = %job.status,
            steps_run = job.populated_count(),
            "Job finished"
        );
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
