//! End-to-end lifecycle across a simulated restart, on disk.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use shhttp_engine::{JobService, Namespace};
use shhttp_protocols::{Executable, Job, Status};
use shhttp_runner::CommandRunner;
use shhttp_store::{FileJobStore, JobStore};

async fn open_service(root: &std::path::Path) -> JobService {
    let jobs = FileJobStore::open(root.join("jobs")).await.unwrap();
    let saved = FileJobStore::open(root.join("saved")).await.unwrap();
    JobService::new(Arc::new(jobs), Arc::new(saved), Arc::new(CommandRunner::new()))
}

async fn wait_terminal(service: &JobService, id: &str) -> Job {
    for _ in 0..500 {
        let job = service.get(Namespace::Jobs, id).await.unwrap();
        if job.status.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", id);
}

/// Records as a crashed process would have left them.
async fn leave_stale_records(root: &std::path::Path) {
    let store = FileJobStore::open(root.join("jobs")).await.unwrap();

    let mut running = Job::new([
        Executable::new("echo").with_args(["first"]),
        Executable::new("echo").with_args(["second"]),
    ])
    .with_id("interrupted")
    .with_status(Status::InProgress);
    running.created = 100;
    running.executions[0].stdout = "first\n".into();
    running.executions[0].start = 100;
    running.executions[0].end = 101;
    store.save_new_job(&mut running).await.unwrap();

    let mut waiting = Job::new([Executable::new("echo").with_args(["later"])])
        .with_id("waiting")
        .with_status(Status::Queued);
    waiting.created = 200;
    store.save_new_job(&mut waiting).await.unwrap();

    let mut finished = Job::new([Executable::new("true")])
        .with_id("finished")
        .with_status(Status::Done);
    finished.created = 50;
    store.save_new_job(&mut finished).await.unwrap();
}

#[tokio::test]
async fn test_restart_with_revival() {
    let temp_dir = TempDir::new().unwrap();
    leave_stale_records(temp_dir.path()).await;

    let service = open_service(temp_dir.path()).await;
    let report = service.revive(true).await.unwrap();
    assert_eq!(report.revived, 1);
    assert_eq!(report.requeued, 1);
    assert_eq!(report.untouched, 1);

    let interrupted = wait_terminal(&service, "interrupted").await;
    assert_eq!(interrupted.status, Status::Done);
    assert_eq!(interrupted.populated_count(), 2);
    assert_eq!(interrupted.executions[1].stdout, "second\n");

    let waiting = wait_terminal(&service, "waiting").await;
    assert_eq!(waiting.status, Status::Done);
    assert_eq!(waiting.executions[0].stdout, "later\n");
}

#[tokio::test]
async fn test_restart_without_revival() {
    let temp_dir = TempDir::new().unwrap();
    leave_stale_records(temp_dir.path()).await;

    let service = open_service(temp_dir.path()).await;
    let report = service.revive(false).await.unwrap();
    assert_eq!(report.failed, 2);
    assert_eq!(report.untouched, 1);

    let interrupted = service.get(Namespace::Jobs, "interrupted").await.unwrap();
    assert_eq!(interrupted.status, Status::Failed);
    // The checkpointed output of the interrupted run is kept, nothing reran.
    assert_eq!(interrupted.populated_count(), 1);
    assert!(!interrupted.executions[1].is_populated());

    let waiting = service.get(Namespace::Jobs, "waiting").await.unwrap();
    assert_eq!(waiting.status, Status::Failed);
    assert!(!waiting.executions[0].is_populated());
}

#[tokio::test]
async fn test_jobs_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    let id = {
        let service = open_service(temp_dir.path()).await;
        let job = Job::new([
            Executable::new("echo").with_args(["hi", "|", "grep", "hi"]).with_shell(true),
            Executable::new("false"),
            Executable::new("echo").with_args(["never"]),
        ]);
        let id = service.submit(job, false).await.unwrap();
        let job = wait_terminal(&service, &id).await;
        assert_eq!(job.status, Status::Failed);
        id
    };

    let service = open_service(temp_dir.path()).await;
    let job = service.get(Namespace::Jobs, &id).await.unwrap();
    assert_eq!(job.status, Status::Failed);
    assert_eq!(job.executions[0].stdout, "hi\n");
    assert_ne!(job.executions[1].exit_code, 0);
    assert!(!job.executions[2].is_populated());

    let report = service.revive(true).await.unwrap();
    assert_eq!(report.untouched, 1);

    assert_eq!(service.clear_finished().await.unwrap(), 1);
    assert!(service.list(Namespace::Jobs).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_templates_persist_and_instantiate() {
    let temp_dir = TempDir::new().unwrap();
    {
        let service = open_service(temp_dir.path()).await;
        let template = Job::new([Executable::new("echo")
            .with_args(["$GREETING"])
            .with_shell(true)
            .with_env("GREETING", "hello")])
        .with_id("greet");
        service.save_template(template).await.unwrap();
    }

    let service = open_service(temp_dir.path()).await;
    assert_eq!(service.list(Namespace::Saved).await.unwrap(), vec!["greet"]);

    let env: BTreeMap<String, String> = [("GREETING".to_string(), "bonjour".to_string())].into();
    let id = service.run_template("greet", &env, true).await.unwrap();
    let job = wait_terminal(&service, &id).await;
    assert_eq!(job.executions[0].stdout, "bonjour\n");
}
