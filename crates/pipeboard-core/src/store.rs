//! GraphStore: the in-memory, locally editable copy of the pipeline graph.
//!
//! Pure state container with no I/O and no validation. All mutation is
//! whole-sequence structural replacement -- a patch closure receives the
//! current sequence by value and returns the next one, so readers always
//! observe either the old or the new sequence, never a half-applied edit.
//!
//! The store is owned exclusively by one editor session for its lifetime;
//! it has no independent persistence.

use crate::model::{Edge, Node, PipelineGraph};

/// The current node and edge sequences of the displayed graph.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore::default()
    }

    // -----------------------------------------------------------------------
    // Read view
    // -----------------------------------------------------------------------

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Clones the current state out as a [`PipelineGraph`].
    pub fn snapshot(&self) -> PipelineGraph {
        PipelineGraph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Mutation primitives
    // -----------------------------------------------------------------------

    /// Replaces the node sequence wholesale.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
    }

    /// Replaces the edge sequence wholesale.
    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    /// Replaces both sequences from a snapshot (hydration).
    pub fn replace(&mut self, graph: PipelineGraph) {
        self.nodes = graph.nodes;
        self.edges = graph.edges;
    }

    /// Structurally replaces the node sequence with the result of `f`.
    pub fn patch_nodes<F>(&mut self, f: F)
    where
        F: FnOnce(Vec<Node>) -> Vec<Node>,
    {
        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = f(nodes);
    }

    /// Structurally replaces the edge sequence with the result of `f`.
    pub fn patch_edges<F>(&mut self, f: F)
    where
        F: FnOnce(Vec<Edge>) -> Vec<Edge>,
    {
        let edges = std::mem::take(&mut self.edges);
        self.edges = f(edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeData, Position};

    fn node(id: &str) -> Node {
        Node {
            id: id.into(),
            kind: "Test".into(),
            position: Position::default(),
            data: NodeData::default(),
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge {
            id: id.into(),
            label: None,
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            data: None,
        }
    }

    #[test]
    fn set_and_lookup() {
        let mut store = GraphStore::new();
        store.set_nodes(vec![node("n1"), node("n2")]);
        store.set_edges(vec![edge("e1", "n1", "n2")]);

        assert_eq!(store.nodes().len(), 2);
        assert!(store.node("n1").is_some());
        assert!(store.node("n3").is_none());
        assert_eq!(store.edge("e1").unwrap().source, "n1");
        assert!(store.edge("e2").is_none());
    }

    #[test]
    fn patch_replaces_sequence_structurally() {
        let mut store = GraphStore::new();
        store.set_edges(vec![edge("e1", "n1", "n2"), edge("e2", "n2", "n3")]);

        store.patch_edges(|edges| edges.into_iter().filter(|e| e.id != "e1").collect());

        assert_eq!(store.edges().len(), 1);
        assert_eq!(store.edges()[0].id, "e2");
    }

    #[test]
    fn patch_reflects_exactly_the_requested_transform() {
        let mut store = GraphStore::new();
        store.set_nodes(vec![node("n1")]);

        store.patch_nodes(|mut nodes| {
            nodes.push(node("n2"));
            nodes
        });

        let ids: Vec<&str> = store.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2"]);
    }

    #[test]
    fn replace_swaps_both_sequences() {
        let mut store = GraphStore::new();
        store.set_nodes(vec![node("old")]);

        store.replace(PipelineGraph {
            nodes: vec![node("n1")],
            edges: vec![edge("e1", "n1", "n1")],
        });

        assert_eq!(store.nodes().len(), 1);
        assert_eq!(store.nodes()[0].id, "n1");
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut store = GraphStore::new();
        store.set_nodes(vec![node("n1")]);
        let snapshot = store.snapshot();

        store.set_nodes(vec![]);

        assert_eq!(snapshot.nodes.len(), 1);
        assert!(store.nodes().is_empty());
    }
}
