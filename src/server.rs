//! Service startup: storage, engine, revival, cleanup and the HTTP listener.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use shhttp_api::{ApiServer, AppState};
use shhttp_config::Config;
use shhttp_engine::{Cleaner, JobService};
use shhttp_runner::CommandRunner;
use shhttp_store::{FileJobStore, JobStore};

/// Run the service until Ctrl-C.
///
/// Failing to open either store is fatal. Everything after that only logs.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = FileJobStore::open(config.storage.jobs_dir()).await?;
    let saved = FileJobStore::open(config.storage.saved_dir()).await?;
    info!(
        jobs = %jobs.root().display(),
        saved = %saved.root().display(),
        "Storage ready"
    );

    let jobs: Arc<dyn JobStore> = Arc::new(jobs);
    let service = Arc::new(JobService::new(
        jobs.clone(),
        Arc::new(saved),
        Arc::new(CommandRunner::new()),
    ));

    if let Err(e) = service.revive(config.engine.revive).await {
        error!("Revival failed: {}", e);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleaner = config.engine.clean_interval().map(|interval| {
        let cleaner = Arc::new(Cleaner::new(jobs.clone(), interval));
        tokio::spawn(cleaner.run(shutdown_rx.clone()))
    });

    let server = ApiServer::new(config.server.clone(), Arc::new(AppState::new(service)));
    let served = server.run(shutdown_signal()).await;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = cleaner {
        let _ = handle.await;
    }

    served?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
