//! Submission paths: immediate tasks and the serial queue.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use shhttp_protocols::{unix_now, Job, Result, Status};
use shhttp_store::JobStore;

use crate::executor::JobExecutor;

/// Accepts jobs and hands them to the executor.
///
/// Immediate jobs each get their own task with no ordering between them.
/// Queued jobs go through one unbounded channel drained by a single worker,
/// so they run strictly one at a time in enqueue order.
pub struct Dispatcher {
    store: Arc<dyn JobStore>,
    executor: Arc<JobExecutor>,
    queue_tx: mpsc::UnboundedSender<Job>,
    pending: Arc<AtomicUsize>,
}

impl Dispatcher {
    /// Create a dispatcher and start its queue worker.
    ///
    /// Must be called from within a Tokio runtime. The worker exits once the
    /// dispatcher is dropped and the queue has drained.
    pub fn new(store: Arc<dyn JobStore>, executor: Arc<JobExecutor>) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_queue_worker(
            executor.clone(),
            queue_rx,
            pending.clone(),
        ));

        Self {
            store,
            executor,
            queue_tx,
            pending,
        }
    }

    /// Persist `job` and schedule it. Returns as soon as the record is
    /// written; execution happens in the background.
    pub async fn submit(&self, mut job: Job, queued: bool) -> Result<String> {
        job.created = unix_now();
        job.last_modified = job.created;
        job.status = if queued {
            Status::Queued
        } else {
            Status::InProgress
        };

        let id = self.store.save_new_job(&mut job).await?;
        info!(
            job_id = %id,
            queued,
            steps = job.executions.len(),
            "Job submitted"
        );

        if queued {
            self.enqueue(job);
        } else {
            self.spawn(job);
        }
        Ok(id)
    }

    /// Run `job` as an independent task.
    pub fn spawn(&self, job: Job) -> JoinHandle<Job> {
        let executor = self.executor.clone();
        tokio::spawn(async move { executor.execute(job).await })
    }

    /// Append `job` to the serial queue. Never blocks.
    pub fn enqueue(&self, job: Job) {
        let job_id = job.id_or_empty().to_string();
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.queue_tx.send(job).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            error!(job_id = %job_id, "Queue worker has stopped, job left queued");
            return;
        }
        debug!(job_id = %job_id, pending = self.queued_pending(), "Job enqueued");
    }

    /// Queued jobs the worker has not finished yet.
    pub fn queued_pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

async fn run_queue_worker(
    executor: Arc<JobExecutor>,
    mut queue_rx: mpsc::UnboundedReceiver<Job>,
    pending: Arc<AtomicUsize>,
) {
    debug!("Queue worker started");
    while let Some(job) = queue_rx.recv().await {
        debug!(job_id = %job.id_or_empty(), "Queue worker picked up job");
        executor.execute(job).await;
        pending.fetch_sub(1, Ordering::SeqCst);
    }
    debug!("Queue worker stopped");
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
