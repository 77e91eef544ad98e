//! Graph-changed notification long polling.
//!
//! A client polls `GET /pipeline/events?since=<version>`. The handler
//! subscribes before comparing versions, so a mutation landing between the
//! client's polls is answered immediately rather than lost until the next
//! change. Without `since`, only changes after the poll arrives are reported.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use pipeboard_backend::protocol::EventTick;
use pipeboard_backend::PipelineBackend;

use crate::state::AppState;

const POLL_WINDOW: Duration = Duration::from_secs(25);

#[derive(Debug, Default, Deserialize)]
pub struct ChangesQuery {
    pub since: Option<u64>,
}

/// Long-polls for a graph change.
///
/// `GET /pipeline/events` -- `200` with the current version when the graph
/// moved past `since` (or moves within the poll window), `204` otherwise.
pub async fn poll_changes(
    State(state): State<AppState>,
    Query(query): Query<ChangesQuery>,
) -> Response {
    let mut subscription = state.backend.subscribe();

    let baseline = query.since.unwrap_or_else(|| state.backend.version());
    if state.backend.version() > baseline {
        subscription.release();
        return tick(&state);
    }

    let outcome = tokio::time::timeout(POLL_WINDOW, subscription.changed()).await;
    subscription.release();
    match outcome {
        Ok(true) => tick(&state),
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

fn tick(state: &AppState) -> Response {
    (
        StatusCode::OK,
        Json(EventTick {
            version: state.backend.version(),
        }),
    )
        .into_response()
}
