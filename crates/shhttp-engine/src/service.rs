//! The job operations offered to the HTTP layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use shhttp_protocols::{unix_now, ExecResult, Executable, Job, Result};
use shhttp_runner::ProcessRunner;
use shhttp_store::JobStore;

use crate::dispatcher::Dispatcher;
use crate::executor::JobExecutor;
use crate::reviver::{RevivalReport, Reviver};

/// Which store an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Submitted jobs and their execution history.
    Jobs,
    /// Saved templates.
    Saved,
}

/// Facade over the dispatcher and both stores.
pub struct JobService {
    jobs: Arc<dyn JobStore>,
    saved: Arc<dyn JobStore>,
    runner: Arc<dyn ProcessRunner>,
    dispatcher: Arc<Dispatcher>,
}

impl JobService {
    /// Wire up the engine. Must be called from within a Tokio runtime, since
    /// it starts the queue worker.
    pub fn new(
        jobs: Arc<dyn JobStore>,
        saved: Arc<dyn JobStore>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let executor = Arc::new(JobExecutor::new(runner.clone(), jobs.clone()));
        let dispatcher = Arc::new(Dispatcher::new(jobs.clone(), executor));
        Self {
            jobs,
            saved,
            runner,
            dispatcher,
        }
    }

    /// Validate, persist and schedule a job. Returns its id.
    pub async fn submit(&self, job: Job, queued: bool) -> Result<String> {
        job.validate()?;
        self.dispatcher.submit(job, queued).await
    }

    /// Run one executable and wait for it. Nothing is persisted.
    ///
    /// A non-zero exit is part of the result, not an error.
    pub async fn run_synchronous(&self, executable: &Executable) -> Result<ExecResult> {
        executable.validate()?;
        Ok(self.runner.run(executable).await)
    }

    /// Build a fresh, unsaved job from a template, with `env` overriding
    /// each execution's environment.
    pub async fn instantiate(
        &self,
        template_id: &str,
        env: &BTreeMap<String, String>,
    ) -> Result<Job> {
        let template = self.saved.get_job(template_id).await?;
        let mut job = template.into_blueprint();
        job.merge_env(env);
        Ok(job)
    }

    /// Instantiate a template and submit the result.
    pub async fn run_template(
        &self,
        template_id: &str,
        env: &BTreeMap<String, String>,
        queued: bool,
    ) -> Result<String> {
        let job = self.instantiate(template_id, env).await?;
        let id = self.submit(job, queued).await?;
        info!(template_id, job_id = %id, "Template instantiated");
        Ok(id)
    }

    /// Store `job` as a template. Any history or status it carries is dropped.
    pub async fn save_template(&self, job: Job) -> Result<String> {
        job.validate()?;
        let id = job.id.clone();
        let mut template = job.into_blueprint();
        template.id = id;
        template.created = unix_now();
        template.last_modified = template.created;

        let id = self.saved.save_new_job(&mut template).await?;
        info!(template_id = %id, "Template saved");
        Ok(id)
    }

    pub async fn list(&self, namespace: Namespace) -> Result<Vec<String>> {
        self.store(namespace).list_ids().await
    }

    pub async fn get(&self, namespace: Namespace, id: &str) -> Result<Job> {
        self.store(namespace).get_job(id).await
    }

    pub async fn delete(&self, namespace: Namespace, id: &str) -> Result<()> {
        self.store(namespace).delete_job(id).await?;
        info!(?namespace, id, "Record deleted");
        Ok(())
    }

    /// Reconcile jobs left over from a previous run. Call once at startup.
    pub async fn revive(&self, enabled: bool) -> Result<RevivalReport> {
        Reviver::new(self.jobs.clone(), self.dispatcher.clone())
            .revive(enabled)
            .await
    }

    /// Prune every live job that is not in progress.
    pub async fn clear_finished(&self) -> Result<usize> {
        self.jobs.clear_finished().await
    }

    pub fn store(&self, namespace: Namespace) -> &Arc<dyn JobStore> {
        match namespace {
            Namespace::Jobs => &self.jobs,
            Namespace::Saved => &self.saved,
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
