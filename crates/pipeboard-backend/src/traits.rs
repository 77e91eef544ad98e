//! The [`PipelineBackend`] trait defining the backend command/query surface.
//!
//! All backends (in-memory, HTTP, test doubles) implement this trait, so the
//! editor session is generic over where the canonical graph actually lives.
//! The trait is async: every call is a suspension point for the editor's
//! single logical thread, and none of them holds a lock over the editor's
//! local store.

use async_trait::async_trait;

use pipeboard_core::{Assignment, Candidate, PipelineGraph, PortLink, Position};

use crate::error::BackendError;
use crate::events::Subscription;

/// The backend query/command/event surface consumed by the editor.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    /// Reads the canonical graph snapshot.
    async fn fetch_graph(&self) -> Result<PipelineGraph, BackendError>;

    /// Replaces the canonical graph wholesale (the apply/commit path).
    async fn replace_graph(&self, graph: PipelineGraph) -> Result<(), BackendError>;

    /// Records a new connection between two ports.
    async fn connect(&self, link: PortLink) -> Result<(), BackendError>;

    /// Removes the connection matching all four endpoint fields.
    async fn disconnect(&self, link: PortLink) -> Result<(), BackendError>;

    /// Persists one edge's property assignment, keyed by edge id.
    async fn set_assignment(
        &self,
        edge_id: &str,
        assignment: Assignment,
    ) -> Result<(), BackendError>;

    /// Instantiates a node of the given kind server-side.
    async fn create_node(&self, kind: &str, position: Position) -> Result<(), BackendError>;

    /// Removes a node (and its connections) server-side.
    async fn remove_node(&self, node_id: &str) -> Result<(), BackendError>;

    /// Lists the node kinds available for placement.
    async fn list_candidates(&self) -> Result<Vec<Candidate>, BackendError>;

    /// Registers for graph-changed notifications.
    ///
    /// The subscription is a scoped resource; the owning session releases it
    /// on teardown.
    fn subscribe(&self) -> Subscription;
}
