//! Router assembly for the pipeboard HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with CORS
//! and tracing middleware layers. Routes use axum 0.8 `/{param}` syntax.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Canonical graph
        .route(
            "/pipeline",
            get(handlers::pipeline::fetch_graph).put(handlers::pipeline::replace_graph),
        )
        // Structural edits (immediate relays from editor sessions)
        .route(
            "/pipeline/connections",
            post(handlers::pipeline::connect).delete(handlers::pipeline::disconnect),
        )
        .route(
            "/pipeline/edges/{edge_id}/assignment",
            put(handlers::pipeline::set_assignment),
        )
        // Node placement
        .route("/pipeline/nodes", post(handlers::nodes::create_node))
        .route(
            "/pipeline/nodes/{node_id}",
            delete(handlers::nodes::remove_node),
        )
        .route("/candidates", get(handlers::nodes::list_candidates))
        // Graph-changed notifications (long poll)
        .route("/pipeline/events", get(handlers::events::poll_changes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
