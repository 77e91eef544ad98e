//! EditorSession: the canonical sync controller.
//!
//! One session object is constructed per editor lifetime and owns the graph
//! store, the edge gesture state, and the backend subscription; nothing here
//! is process-global. The session pulls the canonical graph on construction,
//! re-pulls it on every graph-changed notification (the same idempotent
//! [`EditorSession::hydrate`] routine), and pushes the whole normalized
//! local graph on an explicit [`EditorSession::apply`].
//!
//! Connect and disconnect intents mutate the store *and* relay to the
//! backend immediately; the relay is fire-and-forget with respect to the
//! mutation -- a failed remote call surfaces as `Err` but the local edit
//! stands. Everything else (positions, labels, rewired endpoints) stays
//! local until apply.

use std::sync::Arc;

use uuid::Uuid;

use pipeboard_backend::{PipelineBackend, Subscription};
use pipeboard_core::{
    build_assignment, resolve_edge_context, validate_assignment, Assignment, AssignmentDraft,
    Candidate, Connection, CoreError, Edge, EdgeContext, EdgeData, GraphStore, Node, Position,
};

use crate::error::EditorError;
use crate::lifecycle::{EdgeGesture, GesturePhase};

/// A live editing session against one backend.
pub struct EditorSession<B: PipelineBackend> {
    backend: Arc<B>,
    store: GraphStore,
    gesture: EdgeGesture,
    subscription: Option<Subscription>,
    hydrated: bool,
}

impl<B: PipelineBackend> EditorSession<B> {
    /// Opens a session: subscribes to graph-changed notifications, then
    /// hydrates from the canonical snapshot.
    pub async fn connect(backend: Arc<B>) -> Result<Self, EditorError> {
        let subscription = backend.subscribe();
        let mut session = EditorSession {
            backend,
            store: GraphStore::new(),
            gesture: EdgeGesture::default(),
            subscription: Some(subscription),
            hydrated: false,
        };
        session.hydrate().await?;
        Ok(session)
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    // -----------------------------------------------------------------------
    // Hydrate / apply cycle
    // -----------------------------------------------------------------------

    /// Fetches the canonical graph and replaces both local sequences
    /// wholesale (no merge). Used at session start and on every
    /// notification.
    pub async fn hydrate(&mut self) -> Result<(), EditorError> {
        let graph = self.backend.fetch_graph().await?;
        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "hydrating from canonical snapshot"
        );
        self.store.replace(graph);
        self.hydrated = true;
        Ok(())
    }

    /// Pushes the entire local graph, normalized, as one canonical-replace
    /// command. This is the only path that persists node positions, labels,
    /// and rewired endpoints.
    pub async fn apply(&self) -> Result<(), EditorError> {
        let snapshot = self.store.snapshot().normalized();
        self.backend.replace_graph(snapshot).await?;
        Ok(())
    }

    /// Awaits the next graph-changed notification and re-hydrates. Returns
    /// `false` without hydrating once the subscription is closed or
    /// released.
    pub async fn sync_on_change(&mut self) -> Result<bool, EditorError> {
        let changed = match self.subscription.as_mut() {
            Some(subscription) => subscription.changed().await,
            None => false,
        };
        if !changed {
            return Ok(false);
        }
        self.hydrate().await?;
        Ok(true)
    }

    /// Drains queued notifications without waiting and re-hydrates at most
    /// once. Returns whether a hydration happened.
    pub async fn sync_pending(&mut self) -> Result<bool, EditorError> {
        let changed = match self.subscription.as_mut() {
            Some(subscription) => subscription.try_changed(),
            None => false,
        };
        if !changed {
            return Ok(false);
        }
        self.hydrate().await?;
        Ok(true)
    }

    /// Tears the session down, releasing the notification subscription.
    pub fn close(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
        }
    }

    // -----------------------------------------------------------------------
    // Local-only edits (captured by the next apply)
    // -----------------------------------------------------------------------

    /// Moves a node on the canvas.
    pub fn move_node(&mut self, node_id: &str, position: Position) {
        self.store.patch_nodes(|nodes| {
            nodes
                .into_iter()
                .map(|mut n| {
                    if n.id == node_id {
                        n.position = position;
                    }
                    n
                })
                .collect()
        });
    }

    /// Applies an arbitrary local patch to the node sequence.
    pub fn patch_nodes<F>(&mut self, f: F)
    where
        F: FnOnce(Vec<Node>) -> Vec<Node>,
    {
        self.store.patch_nodes(f);
    }

    /// Applies an arbitrary local patch to the edge sequence.
    pub fn patch_edges<F>(&mut self, f: F)
    where
        F: FnOnce(Vec<Edge>) -> Vec<Edge>,
    {
        self.store.patch_edges(f);
    }

    // -----------------------------------------------------------------------
    // Connect / disconnect (immediate relays)
    // -----------------------------------------------------------------------

    /// Creates a new edge from a connection gesture: adds it to the store
    /// under a generated id and relays a connect command, substituting the
    /// empty string for any missing handle. Returns the new edge id; on a
    /// relay failure the local edge is retained.
    pub async fn connect_edge(&mut self, connection: Connection) -> Result<String, EditorError> {
        let link = connection.into_link();
        let id = format!("edge-{}", Uuid::new_v4());
        let edge = Edge {
            id: id.clone(),
            label: None,
            source: link.source.clone(),
            target: link.target.clone(),
            source_handle: Some(link.source_handle.clone()),
            target_handle: Some(link.target_handle.clone()),
            data: None,
        };
        self.store.patch_edges(|mut edges| {
            edges.push(edge);
            edges
        });

        if let Err(err) = self.backend.connect(link).await {
            tracing::warn!(error = %err, edge = %id, "connect relay failed; local edge retained");
            return Err(err.into());
        }
        Ok(id)
    }

    /// Deliberately removes an edge: deletes it locally and relays a
    /// disconnect command with its endpoints. Unknown ids are ignored.
    pub async fn disconnect_edge(&mut self, edge_id: &str) -> Result<(), EditorError> {
        let Some(edge) = self.store.edge(edge_id) else {
            return Ok(());
        };
        let link = edge.endpoints();
        self.store
            .patch_edges(|edges| edges.into_iter().filter(|e| e.id != edge_id).collect());

        if let Err(err) = self.backend.disconnect(link).await {
            tracing::warn!(error = %err, edge = %edge_id, "disconnect relay failed; local removal retained");
            return Err(err.into());
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reconnect gesture
    // -----------------------------------------------------------------------

    /// Starts a drag-to-rewire gesture on an existing edge. Returns `false`
    /// (and starts nothing) for an unknown edge id.
    pub fn reconnect_start(&mut self, edge_id: &str) -> bool {
        match self.store.edge(edge_id) {
            Some(edge) => {
                self.gesture.begin(edge);
                true
            }
            None => false,
        }
    }

    /// Lands the gesture on a new valid connection: the pending edge's
    /// endpoints are replaced in place (id preserved). Local only; the
    /// rewire persists on the next apply.
    pub fn reconnect(&mut self, connection: Connection) -> bool {
        let Some(edge_id) = self.gesture.commit() else {
            return false;
        };
        let link = connection.into_link();
        self.store.patch_edges(|edges| {
            edges
                .into_iter()
                .map(|mut e| {
                    if e.id == edge_id {
                        e.source = link.source.clone();
                        e.target = link.target.clone();
                        e.source_handle = Some(link.source_handle.clone());
                        e.target_handle = Some(link.target_handle.clone());
                    }
                    e
                })
                .collect()
        });
        true
    }

    /// Ends the gesture. If it never landed on a valid handle, the edge is
    /// deleted locally and exactly one disconnect command is relayed with
    /// the *original* endpoints captured at gesture start.
    pub async fn reconnect_end(&mut self) -> Result<(), EditorError> {
        if let GesturePhase::Removed { edge_id, original } = self.gesture.finish() {
            self.store
                .patch_edges(|edges| edges.into_iter().filter(|e| e.id != edge_id).collect());
            tracing::debug!(edge = %edge_id, "reconnect failed; relaying disconnect");
            if let Err(err) = self.backend.disconnect(original).await {
                tracing::warn!(error = %err, edge = %edge_id, "disconnect relay failed; local removal retained");
                return Err(err.into());
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Assignment editing
    // -----------------------------------------------------------------------

    /// Resolves an edge to its endpoint ports for editing. `None` (with no
    /// side effect) on any lookup miss -- stale edges open no editor.
    pub fn edge_context(&self, edge_id: &str) -> Option<EdgeContext<'_>> {
        resolve_edge_context(&self.store, edge_id)
    }

    /// Builds the editable assignment working copy for an edge, seeded from
    /// its current assignment.
    pub fn assignment_draft(&self, edge_id: &str) -> Option<AssignmentDraft> {
        let ctx = self.edge_context(edge_id)?;
        Some(build_assignment(
            ctx.target_port,
            ctx.source_port,
            &ctx.edge.assignment(),
        ))
    }

    /// Validates an assignment against the edge's resolved ports, patches
    /// the edge's data, and relays an assignment-set command. On validation
    /// failure nothing is mutated and nothing is sent.
    pub async fn commit_assignment(
        &mut self,
        edge_id: &str,
        assignment: Assignment,
    ) -> Result<(), EditorError> {
        {
            let ctx = resolve_edge_context(&self.store, edge_id).ok_or_else(|| {
                CoreError::UnresolvableEdge {
                    id: edge_id.to_string(),
                }
            })?;
            validate_assignment(&assignment, ctx.source_port, ctx.target_port)?;
        }

        self.store.patch_edges(|edges| {
            edges
                .into_iter()
                .map(|mut e| {
                    if e.id == edge_id {
                        e.data = Some(EdgeData {
                            assignment: assignment.clone(),
                        });
                    }
                    e
                })
                .collect()
        });
        self.backend.set_assignment(edge_id, assignment).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Node placement (consumed verbatim from the backend)
    // -----------------------------------------------------------------------

    /// Asks the backend to instantiate a node; the node arrives through the
    /// resulting graph-changed notification.
    pub async fn create_node(&self, kind: &str, position: Position) -> Result<(), EditorError> {
        self.backend.create_node(kind, position).await?;
        Ok(())
    }

    /// Asks the backend to remove a node and its connections.
    pub async fn remove_node(&self, node_id: &str) -> Result<(), EditorError> {
        self.backend.remove_node(node_id).await?;
        Ok(())
    }

    /// Lists the node kinds available for placement.
    pub async fn candidates(&self) -> Result<Vec<Candidate>, EditorError> {
        Ok(self.backend.list_candidates().await?)
    }
}
