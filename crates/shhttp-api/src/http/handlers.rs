//! Request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use shhttp_engine::Namespace;
use shhttp_protocols::{ExecResult, Executable, Job};

use crate::error::ApiError;
use crate::state::AppState;

type Shared = State<Arc<AppState>>;

/// `?queued=true` selects the serial queue.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitParams {
    #[serde(default)]
    pub queued: bool,
}

/// Body of a template run.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunTemplateRequest {
    #[serde(default, deserialize_with = "shhttp_protocols::null_as_default")]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdsResponse {
    pub ids: Vec<String>,
}

/// POST /v1/exec
///
/// Responds 200 whatever the child's exit code.
pub async fn exec(
    State(state): Shared,
    payload: Result<Json<Executable>, JsonRejection>,
) -> Result<Json<ExecResult>, ApiError> {
    let Json(executable) = payload?;
    debug!(command = %executable.command, "Synchronous exec");
    let result = state.service.run_synchronous(&executable).await?;
    Ok(Json(result))
}

/// POST /v1/jobs
pub async fn submit_job(
    State(state): Shared,
    Query(params): Query<SubmitParams>,
    payload: Result<Json<Job>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError> {
    let Json(job) = payload?;
    let id = state.service.submit(job, params.queued).await?;
    Ok(Json(IdResponse { id }))
}

/// GET /v1/jobs
pub async fn list_jobs(State(state): Shared) -> Result<Json<IdsResponse>, ApiError> {
    list(&state, Namespace::Jobs).await
}

/// GET /v1/jobs/{id}
pub async fn get_job(
    State(state): Shared,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.service.get(Namespace::Jobs, &id).await?))
}

/// DELETE /v1/jobs/{id}
pub async fn delete_job(
    State(state): Shared,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(Namespace::Jobs, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/saved
pub async fn list_saved(State(state): Shared) -> Result<Json<IdsResponse>, ApiError> {
    list(&state, Namespace::Saved).await
}

/// PUT /v1/saved
pub async fn save_template(
    State(state): Shared,
    payload: Result<Json<Job>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(job) = payload?;
    let id = state.service.save_template(job).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /v1/saved/{id}
pub async fn get_saved(
    State(state): Shared,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.service.get(Namespace::Saved, &id).await?))
}

/// POST /v1/saved/{id}
///
/// The body is optional; an empty body runs the template as stored.
pub async fn run_saved(
    State(state): Shared,
    Path(id): Path<String>,
    Query(params): Query<SubmitParams>,
    body: Bytes,
) -> Result<Json<IdResponse>, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RunTemplateRequest::default()
    } else {
        serde_json::from_slice::<RunTemplateRequest>(&body)?
    };

    let job_id = state
        .service
        .run_template(&id, &request.env, params.queued)
        .await?;
    Ok(Json(IdResponse { id: job_id }))
}

/// DELETE /v1/saved/{id}
pub async fn delete_saved(
    State(state): Shared,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(Namespace::Saved, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health
pub async fn health(State(state): Shared) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "uptime_secs": state.uptime().as_secs(),
        "queued_pending": state.service.dispatcher().queued_pending(),
    }))
}

async fn list(state: &AppState, namespace: Namespace) -> Result<Json<IdsResponse>, ApiError> {
    let mut ids = state.service.list(namespace).await?;
    ids.sort();
    Ok(Json(IdsResponse { ids }))
}
