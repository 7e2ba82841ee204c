//! Route handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::dto::{HealthResponse, RunRequest, RunResponse, TaskQuery, TaskResponse};
use crate::error::ApiError;
use crate::server::AppState;

/// Create a new task and return its ID
pub async fn run_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Json<RunResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let payload = request.decode()?;

    let id = state.service.create_task(payload).await?;
    Ok(Json(RunResponse { id: id.to_string() }))
}

/// Get a task by the ID in the path
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    lookup(&state, Some(id)).await
}

/// Get a task by the `id` query parameter
pub async fn get_task_by_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<TaskResponse>, ApiError> {
    lookup(&state, query.id).await
}

async fn lookup(state: &AppState, id: Option<String>) -> Result<Json<TaskResponse>, ApiError> {
    let id = id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("id is required".to_string()))?;

    let snapshot = state.service.task_result(&id).await?;
    debug!("Served task {} ({})", id, snapshot.status);
    Ok(Json(TaskResponse::from(snapshot)))
}

/// Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
