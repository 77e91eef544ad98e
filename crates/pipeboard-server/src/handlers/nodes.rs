//! Node placement and candidate-catalog handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use pipeboard_backend::protocol::CreateNodeRequest;
use pipeboard_backend::PipelineBackend;
use pipeboard_core::Candidate;

use crate::error::ApiError;
use crate::state::AppState;

/// Instantiates a node from the candidate catalog.
///
/// `POST /pipeline/nodes`
pub async fn create_node(
    State(state): State<AppState>,
    Json(req): Json<CreateNodeRequest>,
) -> Result<StatusCode, ApiError> {
    state.backend.create_node(&req.kind, req.position).await?;
    Ok(StatusCode::CREATED)
}

/// Removes a node and its connections.
///
/// `DELETE /pipeline/nodes/{node_id}`
pub async fn remove_node(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.backend.remove_node(&node_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists the node kinds available for placement.
///
/// `GET /candidates`
pub async fn list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Candidate>>, ApiError> {
    Ok(Json(state.backend.list_candidates().await?))
}
