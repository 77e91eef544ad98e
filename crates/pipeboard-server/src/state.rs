//! Shared application state for the HTTP server.

use std::sync::Arc;

use pipeboard_backend::{InMemoryBackend, NodeTemplate};

/// Shared state: the in-memory pipeline backend every handler talks to.
///
/// `InMemoryBackend` guards its graph behind an async mutex internally, so
/// the state itself is a cheap `Arc` clone per request.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<InMemoryBackend>,
}

impl AppState {
    /// Creates state with a backend serving the given node-template catalog.
    pub fn new(catalog: Vec<NodeTemplate>) -> Self {
        AppState {
            backend: Arc::new(InMemoryBackend::with_catalog(catalog)),
        }
    }
}
