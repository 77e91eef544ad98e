//! Canonical graph and structural-edit handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use pipeboard_backend::protocol::SetAssignmentRequest;
use pipeboard_backend::PipelineBackend;
use pipeboard_core::{PipelineGraph, PortLink};

use crate::error::ApiError;
use crate::state::AppState;

/// Reads the canonical graph snapshot.
///
/// `GET /pipeline`
pub async fn fetch_graph(
    State(state): State<AppState>,
) -> Result<Json<PipelineGraph>, ApiError> {
    Ok(Json(state.backend.fetch_graph().await?))
}

/// Replaces the canonical graph wholesale (an editor's apply/commit).
///
/// `PUT /pipeline`
pub async fn replace_graph(
    State(state): State<AppState>,
    Json(graph): Json<PipelineGraph>,
) -> Result<StatusCode, ApiError> {
    state.backend.replace_graph(graph).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Records a new connection.
///
/// `POST /pipeline/connections`
pub async fn connect(
    State(state): State<AppState>,
    Json(link): Json<PortLink>,
) -> Result<StatusCode, ApiError> {
    state.backend.connect(link).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Removes the connection matching all four endpoint fields.
///
/// `DELETE /pipeline/connections`
pub async fn disconnect(
    State(state): State<AppState>,
    Json(link): Json<PortLink>,
) -> Result<StatusCode, ApiError> {
    state.backend.disconnect(link).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Persists one edge's property assignment.
///
/// `PUT /pipeline/edges/{edge_id}/assignment`
pub async fn set_assignment(
    State(state): State<AppState>,
    Path(edge_id): Path<String>,
    Json(req): Json<SetAssignmentRequest>,
) -> Result<StatusCode, ApiError> {
    state.backend.set_assignment(&edge_id, req.assignment).await?;
    Ok(StatusCode::NO_CONTENT)
}
