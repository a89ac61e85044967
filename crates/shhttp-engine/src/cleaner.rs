//! Periodic pruning of records that are not in progress.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{error, info};

use shhttp_store::JobStore;

/// Runs `clear_finished` on a fixed interval until told to stop.
pub struct Cleaner {
    store: Arc<dyn JobStore>,
    interval: Duration,
}

impl Cleaner {
    /// `interval` must be non-zero.
    pub fn new(store: Arc<dyn JobStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Sweep immediately, then once per interval, until `cancel` changes.
    pub async fn run(self: Arc<Self>, cancel: watch::Receiver<bool>) {
        info!("Cleaner started (interval: {:?})", self.interval);

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cancel = cancel;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep().await;
                }
                _ = cancel.changed() => {
                    info!("Cleaner shutting down");
                    break;
                }
            }
        }
    }

    /// One pass over the store. Returns how many records were removed.
    pub async fn sweep(&self) -> usize {
        match self.store.clear_finished().await {
            Ok(removed) => {
                info!(removed, "Cleared finished jobs");
                removed
            }
            Err(e) => {
                error!("Cleanup sweep failed: {}", e);
                0
            }
        }
    }
}
