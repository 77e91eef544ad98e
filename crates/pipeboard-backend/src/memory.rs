//! In-memory implementation of [`PipelineBackend`].
//!
//! [`InMemoryBackend`] is a first-class backend for tests, embedded editors,
//! and the HTTP facade. It holds the canonical graph behind an async mutex,
//! instantiates nodes from a registered [`NodeTemplate`] catalog, and emits
//! one graph-changed notification per successful mutation.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use pipeboard_core::{
    Assignment, Candidate, Edge, EdgeData, Node, NodeData, PipelineGraph, Port, PortLink, Position,
};

use crate::error::BackendError;
use crate::events::{ChangeBus, Subscription};
use crate::traits::PipelineBackend;

/// A port declaration inside a [`NodeTemplate`]; `parent` is filled in with
/// the node id at instantiation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    pub name: String,
    #[serde(default)]
    pub property_names: Vec<String>,
}

impl PortSpec {
    fn materialize(&self, parent: &str) -> Port {
        Port::new(parent, self.name.clone()).with_properties(self.property_names.iter().cloned())
    }
}

/// An instantiable node kind: the template behind one catalog [`Candidate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub kind: String,
    pub label: String,
    #[serde(default)]
    pub inputs: Vec<PortSpec>,
    #[serde(default)]
    pub outputs: Vec<PortSpec>,
}

impl NodeTemplate {
    pub fn new(kind: impl Into<String>, label: impl Into<String>) -> Self {
        NodeTemplate {
            kind: kind.into(),
            label: label.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Builder-style helper declaring an input port.
    pub fn input<I, S>(mut self, name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.push(PortSpec {
            name: name.into(),
            property_names: properties.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Builder-style helper declaring an output port.
    pub fn output<I, S>(mut self, name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.push(PortSpec {
            name: name.into(),
            property_names: properties.into_iter().map(Into::into).collect(),
        });
        self
    }

    fn instantiate(&self, position: Position) -> Node {
        let id = format!("{}-{}", self.kind, Uuid::new_v4());
        Node {
            id: id.clone(),
            kind: self.kind.clone(),
            position,
            data: NodeData {
                label: self.label.clone(),
                inputs: self.inputs.iter().map(|p| p.materialize(&id)).collect(),
                outputs: self.outputs.iter().map(|p| p.materialize(&id)).collect(),
            },
        }
    }
}

/// The in-memory reference backend.
pub struct InMemoryBackend {
    graph: Mutex<PipelineGraph>,
    catalog: Vec<NodeTemplate>,
    bus: ChangeBus,
    version: AtomicU64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        InMemoryBackend::with_catalog(Vec::new())
    }

    pub fn with_catalog(catalog: Vec<NodeTemplate>) -> Self {
        InMemoryBackend {
            graph: Mutex::new(PipelineGraph::default()),
            catalog,
            bus: ChangeBus::new(),
            version: AtomicU64::new(0),
        }
    }

    /// The number of mutations applied so far. Monotonically increasing;
    /// used by the HTTP facade's long-poll endpoint.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    fn template(&self, kind: &str) -> Option<&NodeTemplate> {
        self.catalog.iter().find(|t| t.kind == kind)
    }

    fn bump_and_notify(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
        self.bus.notify();
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        InMemoryBackend::new()
    }
}

#[async_trait]
impl PipelineBackend for InMemoryBackend {
    async fn fetch_graph(&self) -> Result<PipelineGraph, BackendError> {
        Ok(self.graph.lock().await.clone())
    }

    async fn replace_graph(&self, graph: PipelineGraph) -> Result<(), BackendError> {
        *self.graph.lock().await = graph.normalized();
        self.bump_and_notify();
        Ok(())
    }

    async fn connect(&self, link: PortLink) -> Result<(), BackendError> {
        {
            let mut graph = self.graph.lock().await;
            // Idempotent: a second connect of an identical link is a no-op.
            if graph.edges.iter().any(|e| e.endpoints() == link) {
                return Ok(());
            }
            graph.edges.push(
                Edge {
                    id: format!("edge-{}", Uuid::new_v4()),
                    label: None,
                    source: link.source,
                    target: link.target,
                    source_handle: Some(link.source_handle),
                    target_handle: Some(link.target_handle),
                    data: Some(EdgeData::default()),
                }
                .normalized(),
            );
        }
        self.bump_and_notify();
        Ok(())
    }

    async fn disconnect(&self, link: PortLink) -> Result<(), BackendError> {
        let removed = {
            let mut graph = self.graph.lock().await;
            let before = graph.edges.len();
            graph.edges.retain(|e| e.endpoints() != link);
            graph.edges.len() != before
        };
        if removed {
            self.bump_and_notify();
        }
        Ok(())
    }

    async fn set_assignment(
        &self,
        edge_id: &str,
        assignment: Assignment,
    ) -> Result<(), BackendError> {
        {
            let mut graph = self.graph.lock().await;
            let edge = graph
                .edges
                .iter_mut()
                .find(|e| e.id == edge_id)
                .ok_or_else(|| BackendError::EdgeNotFound {
                    id: edge_id.to_string(),
                })?;
            edge.data = Some(EdgeData { assignment });
        }
        self.bump_and_notify();
        Ok(())
    }

    async fn create_node(&self, kind: &str, position: Position) -> Result<(), BackendError> {
        let template = self.template(kind).ok_or_else(|| BackendError::UnknownKind {
            kind: kind.to_string(),
        })?;
        let node = template.instantiate(position);
        self.graph.lock().await.nodes.push(node);
        self.bump_and_notify();
        Ok(())
    }

    async fn remove_node(&self, node_id: &str) -> Result<(), BackendError> {
        {
            let mut graph = self.graph.lock().await;
            let before = graph.nodes.len();
            graph.nodes.retain(|n| n.id != node_id);
            if graph.nodes.len() == before {
                return Err(BackendError::NodeNotFound {
                    id: node_id.to_string(),
                });
            }
            // Connections to a removed node go with it.
            graph
                .edges
                .retain(|e| e.source != node_id && e.target != node_id);
        }
        self.bump_and_notify();
        Ok(())
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>, BackendError> {
        Ok(self
            .catalog
            .iter()
            .map(|t| Candidate {
                kind: t.kind.clone(),
                label: t.label.clone(),
            })
            .collect())
    }

    fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }
}
