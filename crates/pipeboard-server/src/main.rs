//! Binary entrypoint for the pipeboard HTTP server.
//!
//! Reads configuration from environment variables:
//! - `PIPEBOARD_PORT`: listen port (default: "3900")
//! - `PIPEBOARD_CATALOG`: path to a JSON file with the node-template catalog
//!   (default: empty catalog)

use pipeboard_backend::NodeTemplate;
use pipeboard_server::router::build_router;
use pipeboard_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port = std::env::var("PIPEBOARD_PORT").unwrap_or_else(|_| "3900".to_string());
    let catalog: Vec<NodeTemplate> = match std::env::var("PIPEBOARD_CATALOG") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)
                .expect("Failed to read catalog file");
            serde_json::from_str(&text).expect("Failed to parse catalog file")
        }
        Err(_) => Vec::new(),
    };

    let state = AppState::new(catalog);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("pipeboard server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
