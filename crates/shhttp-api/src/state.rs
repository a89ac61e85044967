//! Application state.

use std::sync::Arc;
use std::time::Instant;

use shhttp_engine::JobService;

/// State shared across handlers.
pub struct AppState {
    pub service: Arc<JobService>,
    start_time: Instant,
}

impl AppState {
    pub fn new(service: Arc<JobService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
