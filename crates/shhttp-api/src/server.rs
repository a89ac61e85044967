//! HTTP server.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use shhttp_config::ServerConfig;

use crate::http::routes::create_router;
use crate::state::AppState;

/// Serves the API on the configured address.
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    pub fn addr(&self) -> String {
        self.config.addr()
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests.
    pub async fn run<F>(&self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_router(self.state.clone());

        let listener = TcpListener::bind(self.addr()).await?;
        info!("shhttp listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("shhttp server stopped");
        Ok(())
    }
}
