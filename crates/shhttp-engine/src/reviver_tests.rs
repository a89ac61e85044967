use super::*;
use std::time::Duration;

use crate::executor::JobExecutor;
use crate::testing::{wait_terminal, RecordingStore, ScriptedRunner};
use shhttp_protocols::Executable;

struct Fixture {
    runner: Arc<ScriptedRunner>,
    store: Arc<RecordingStore>,
    dispatcher: Arc<Dispatcher>,
}

impl Fixture {
    fn new() -> Self {
        let runner = Arc::new(ScriptedRunner::new());
        let store = Arc::new(RecordingStore::new());
        let executor = Arc::new(JobExecutor::new(runner.clone(), store.clone()));
        let dispatcher = Arc::new(Dispatcher::new(store.clone(), executor));
        Self {
            runner,
            store,
            dispatcher,
        }
    }

    fn reviver(&self) -> Reviver {
        Reviver::new(self.store.clone(), self.dispatcher.clone())
    }

    async fn put(&self, id: &str, status: Status, created: i64) {
        let mut job = Job::new([Executable::new(format!("{id}-step"))])
            .with_id(id)
            .with_status(status);
        job.created = created;
        self.store.save_new_job(&mut job).await.unwrap();
    }

    async fn drain(&self) {
        for _ in 0..500 {
            if self.dispatcher.queued_pending() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("queue did not drain");
    }
}

#[tokio::test]
async fn test_disabled_fails_stale_jobs_without_running() {
    let fx = Fixture::new();
    fx.put("running", Status::InProgress, 1).await;
    fx.put("waiting", Status::Queued, 2).await;
    fx.put("done", Status::Done, 3).await;
    fx.put("failed", Status::Failed, 4).await;

    let report = fx.reviver().revive(false).await.unwrap();

    assert_eq!(
        report,
        RevivalReport {
            failed: 2,
            untouched: 2,
            ..Default::default()
        }
    );
    for id in ["running", "waiting", "failed"] {
        assert_eq!(fx.store.get_job(id).await.unwrap().status, Status::Failed);
    }
    assert_eq!(fx.store.get_job("done").await.unwrap().status, Status::Done);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(fx.runner.calls().is_empty());
    assert_eq!(fx.dispatcher.queued_pending(), 0);
}

#[tokio::test]
async fn test_enabled_restarts_in_progress_jobs() {
    let fx = Fixture::new();
    fx.put("running", Status::InProgress, 1).await;

    let report = fx.reviver().revive(true).await.unwrap();
    assert_eq!(report.revived, 1);

    let job = wait_terminal(&*fx.store, "running").await;
    assert_eq!(job.status, Status::Done);
    assert_eq!(fx.runner.calls(), vec!["running-step"]);
}

#[tokio::test]
async fn test_revived_job_restarts_from_first_step() {
    let fx = Fixture::new();
    let mut job = Job::new([Executable::new("first"), Executable::new("second")])
        .with_id("half-done")
        .with_status(Status::InProgress);
    job.executions[0].stdout = "stale\n".into();
    job.executions[0].start = 5;
    job.executions[0].end = 6;
    fx.store.save_new_job(&mut job).await.unwrap();

    fx.reviver().revive(true).await.unwrap();
    let job = wait_terminal(&*fx.store, "half-done").await;

    assert_eq!(fx.runner.calls(), vec!["first", "second"]);
    assert_eq!(job.executions[0].stdout, "first\n");
}

#[tokio::test]
async fn test_enabled_requeues_in_creation_order() {
    let fx = Fixture::new();
    fx.put("c", Status::Queued, 30).await;
    fx.put("a", Status::Queued, 10).await;
    fx.put("b2", Status::Queued, 20).await;
    fx.put("b1", Status::Queued, 20).await;

    let report = fx.reviver().revive(true).await.unwrap();
    assert_eq!(report.requeued, 4);
    fx.drain().await;

    assert_eq!(
        fx.runner.calls(),
        vec!["a-step", "b1-step", "b2-step", "c-step"]
    );
    for id in ["a", "b1", "b2", "c"] {
        assert_eq!(fx.store.get_job(id).await.unwrap().status, Status::Done);
    }
}

#[tokio::test]
async fn test_terminal_jobs_are_untouched() {
    let fx = Fixture::new();
    fx.put("done", Status::Done, 1).await;
    fx.put("failed", Status::Failed, 2).await;

    let report = fx.reviver().revive(true).await.unwrap();

    assert_eq!(report.untouched, 2);
    assert!(fx.store.updates().is_empty());
}

#[tokio::test]
async fn test_empty_store() {
    let fx = Fixture::new();
    let report = fx.reviver().revive(true).await.unwrap();
    assert_eq!(report, RevivalReport::default());
}
