//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the service router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .route("/exec", post(handlers::exec))
        .route("/jobs", post(handlers::submit_job).get(handlers::list_jobs))
        .route(
            "/jobs/{id}",
            get(handlers::get_job).delete(handlers::delete_job),
        )
        .route(
            "/saved",
            get(handlers::list_saved).put(handlers::save_template),
        )
        .route(
            "/saved/{id}",
            get(handlers::get_saved)
                .post(handlers::run_saved)
                .delete(handlers::delete_saved),
        );

    Router::new()
        .nest("/v1", v1)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
