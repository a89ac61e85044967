//! Test doubles shared by the engine's unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use shhttp_protocols::{unix_now, ExecResult, Executable, Job, Result, Status};
use shhttp_runner::ProcessRunner;
use shhttp_store::{JobStore, MemoryJobStore};

/// Runner that never spawns anything: the command `fail` exits 1, every
/// other command exits 0 and echoes its name.
#[derive(Default)]
pub struct ScriptedRunner {
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, executable: &Executable) -> ExecResult {
        self.calls.lock().unwrap().push(executable.command.clone());
        let start = unix_now().max(1);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        ExecResult {
            executable: Some(executable.clone()),
            stdout: format!("{}\n", executable.command),
            stderr: String::new(),
            exit_code: if executable.command == "fail" { 1 } else { 0 },
            start,
            end: unix_now().max(start),
        }
    }
}

/// Memory store that records every update in order.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryJobStore,
    updates: Mutex<Vec<(String, Status)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<(String, Status)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobStore for RecordingStore {
    async fn save_new_job(&self, job: &mut Job) -> Result<String> {
        self.inner.save_new_job(job).await
    }

    async fn update_job(&self, job: &Job) -> Result<()> {
        self.inner.update_job(job).await?;
        self.updates
            .lock()
            .unwrap()
            .push((job.id_or_empty().to_string(), job.status));
        Ok(())
    }

    async fn get_job(&self, id: &str) -> Result<Job> {
        self.inner.get_job(id).await
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        self.inner.list_ids().await
    }

    async fn delete_job(&self, id: &str) -> Result<()> {
        self.inner.delete_job(id).await
    }
}

/// Poll `store` until the job `id` reaches a terminal status.
pub async fn wait_terminal(store: &dyn JobStore, id: &str) -> Job {
    for _ in 0..500 {
        if let Ok(job) = store.get_job(id).await {
            if job.status.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", id);
}
