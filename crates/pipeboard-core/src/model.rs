//! Wire-format data model for the pipeline graph.
//!
//! These types are shared between the local editing surface and the backend
//! protocol: a [`PipelineGraph`] is both what the backend serves as the
//! canonical snapshot and what the editor ships back wholesale on apply.
//! Field names serialize in camelCase to match the protocol.
//!
//! # Local form vs wire form
//!
//! Edges created locally may be missing a label, handles, or assignment data
//! (a connection gesture does not always carry them). The wire form requires
//! every field to be present: absent label/handle become the empty string,
//! absent data becomes an empty assignment map. [`Edge::normalized`] and
//! [`PipelineGraph::normalized`] are the pure projection from local form to
//! wire form; they never mutate in place.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property-to-property assignment attached to an edge.
///
/// Keys are property names of the *target* (input) port, values are property
/// names of the *source* (output) port. Insertion order is preserved so the
/// serialized form is stable.
pub type Assignment = IndexMap<String, String>;

/// A 2D canvas position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// A named, directional connection point on a node.
///
/// `parent` is the id of the owning node. `name` is unique among the node's
/// ports of the same direction. `property_names` enumerates the data fields
/// the port exposes for assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    #[serde(default)]
    pub parent: String,
    pub name: String,
    #[serde(default)]
    pub property_names: Vec<String>,
}

impl Port {
    pub fn new(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Port {
            parent: parent.into(),
            name: name.into(),
            property_names: Vec::new(),
        }
    }

    /// Builder-style helper adding property names.
    pub fn with_properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if `name` is one of this port's property names.
    pub fn has_property(&self, name: &str) -> bool {
        self.property_names.iter().any(|p| p == name)
    }
}

/// Display payload of a node: label plus its input and output ports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub inputs: Vec<Port>,
    #[serde(default)]
    pub outputs: Vec<Port>,
}

/// A placed component instance with input/output ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// The instantiable component kind this node was created from.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    /// Finds an output port by name.
    pub fn output(&self, name: &str) -> Option<&Port> {
        self.data.outputs.iter().find(|p| p.name == name)
    }

    /// Finds an input port by name.
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.data.inputs.iter().find(|p| p.name == name)
    }
}

/// Edge payload: the property assignment map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(default)]
    pub assignment: Assignment,
}

/// A directed connection from an output port to an input port.
///
/// Invariants maintained by the resolver/validator, not by this type:
/// - `source_handle` names an output port of node `source`
/// - `target_handle` names an input port of node `target`
/// - assignment keys are target-port properties, values source-port
///   properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
}

impl Edge {
    /// The edge's endpoints as a concrete [`PortLink`], substituting the
    /// empty string for any missing handle.
    pub fn endpoints(&self) -> PortLink {
        PortLink {
            source: self.source.clone(),
            target: self.target.clone(),
            source_handle: self.source_handle.clone().unwrap_or_default(),
            target_handle: self.target_handle.clone().unwrap_or_default(),
        }
    }

    /// The assignment map, empty if the edge carries no data.
    pub fn assignment(&self) -> Assignment {
        self.data
            .as_ref()
            .map(|d| d.assignment.clone())
            .unwrap_or_default()
    }

    /// Pure projection to the wire form: every optional field present.
    pub fn normalized(&self) -> Edge {
        Edge {
            id: self.id.clone(),
            label: Some(self.label.clone().unwrap_or_default()),
            source: self.source.clone(),
            target: self.target.clone(),
            source_handle: Some(self.source_handle.clone().unwrap_or_default()),
            target_handle: Some(self.target_handle.clone().unwrap_or_default()),
            data: Some(self.data.clone().unwrap_or_default()),
        }
    }
}

/// The full graph: the canonical snapshot shape and the local store shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl PipelineGraph {
    /// Pure projection to the wire form. Nodes are already concrete; edges
    /// get their optional fields filled.
    pub fn normalized(&self) -> PipelineGraph {
        PipelineGraph {
            nodes: self.nodes.clone(),
            edges: self.edges.iter().map(Edge::normalized).collect(),
        }
    }
}

/// A backend-advertised node kind available for placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub kind: String,
    pub label: String,
}

/// Concrete endpoints of a connect/disconnect command.
///
/// All four fields are plain strings; callers substitute the empty string for
/// anything missing before constructing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortLink {
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
}

/// A connection gesture payload: endpoints as reported by the editing
/// surface, any of which may be missing mid-gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub source: Option<String>,
    pub target: Option<String>,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        source_handle: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Connection {
            source: Some(source.into()),
            target: Some(target.into()),
            source_handle: Some(source_handle.into()),
            target_handle: Some(target_handle.into()),
        }
    }

    /// Normalizes to a concrete [`PortLink`], substituting the empty string
    /// for any missing field.
    pub fn into_link(self) -> PortLink {
        PortLink {
            source: self.source.unwrap_or_default(),
            target: self.target.unwrap_or_default(),
            source_handle: self.source_handle.unwrap_or_default(),
            target_handle: self.target_handle.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_edge() -> Edge {
        Edge {
            id: "e1".into(),
            label: None,
            source: "n1".into(),
            target: "n2".into(),
            source_handle: Some("out-a".into()),
            target_handle: None,
            data: None,
        }
    }

    #[test]
    fn edge_serializes_camel_case() {
        let edge = sample_edge().normalized();
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "e1",
                "label": "",
                "source": "n1",
                "target": "n2",
                "sourceHandle": "out-a",
                "targetHandle": "",
                "data": { "assignment": {} },
            })
        );
    }

    #[test]
    fn edge_deserializes_with_absent_optionals() {
        let edge: Edge = serde_json::from_value(json!({
            "id": "e1",
            "source": "n1",
            "target": "n2",
        }))
        .unwrap();
        assert_eq!(edge.label, None);
        assert_eq!(edge.source_handle, None);
        assert_eq!(edge.target_handle, None);
        assert_eq!(edge.data, None);
    }

    #[test]
    fn normalization_fills_optionals_and_is_idempotent() {
        let edge = sample_edge();
        let normalized = edge.normalized();
        assert_eq!(normalized.label.as_deref(), Some(""));
        assert_eq!(normalized.source_handle.as_deref(), Some("out-a"));
        assert_eq!(normalized.target_handle.as_deref(), Some(""));
        assert_eq!(normalized.data, Some(EdgeData::default()));

        // Normalizing an already-normalized edge changes nothing.
        assert_eq!(normalized.normalized(), normalized);
    }

    #[test]
    fn normalization_preserves_existing_values() {
        let mut edge = sample_edge();
        edge.label = Some("stream".into());
        let mut assignment = Assignment::new();
        assignment.insert("p".into(), "x".into());
        edge.data = Some(EdgeData {
            assignment: assignment.clone(),
        });

        let normalized = edge.normalized();
        assert_eq!(normalized.label.as_deref(), Some("stream"));
        assert_eq!(normalized.data.unwrap().assignment, assignment);
    }

    #[test]
    fn endpoints_substitute_empty_strings() {
        let link = sample_edge().endpoints();
        assert_eq!(
            link,
            PortLink {
                source: "n1".into(),
                target: "n2".into(),
                source_handle: "out-a".into(),
                target_handle: "".into(),
            }
        );
    }

    #[test]
    fn connection_into_link_substitutes_empty_strings() {
        let connection = Connection {
            source: Some("n1".into()),
            target: None,
            source_handle: None,
            target_handle: Some("in-a".into()),
        };
        let link = connection.into_link();
        assert_eq!(link.source, "n1");
        assert_eq!(link.target, "");
        assert_eq!(link.source_handle, "");
        assert_eq!(link.target_handle, "in-a");
    }

    #[test]
    fn graph_wire_format() {
        let graph = PipelineGraph {
            nodes: vec![Node {
                id: "n1".into(),
                kind: "Publisher".into(),
                position: Position::new(10.0, 20.0),
                data: NodeData {
                    label: "Publisher".into(),
                    inputs: vec![],
                    outputs: vec![Port::new("n1", "out-a").with_properties(["x", "y"])],
                },
            }],
            edges: vec![sample_edge()],
        };

        let value = serde_json::to_value(graph.normalized()).unwrap();
        assert_eq!(
            value,
            json!({
                "nodes": [{
                    "id": "n1",
                    "kind": "Publisher",
                    "position": { "x": 10.0, "y": 20.0 },
                    "data": {
                        "label": "Publisher",
                        "inputs": [],
                        "outputs": [{
                            "parent": "n1",
                            "name": "out-a",
                            "propertyNames": ["x", "y"],
                        }],
                    },
                }],
                "edges": [{
                    "id": "e1",
                    "label": "",
                    "source": "n1",
                    "target": "n2",
                    "sourceHandle": "out-a",
                    "targetHandle": "",
                    "data": { "assignment": {} },
                }],
            })
        );
    }

    #[test]
    fn graph_serde_roundtrip() {
        let graph = PipelineGraph {
            nodes: vec![Node {
                id: "n1".into(),
                kind: "Subscriber".into(),
                position: Position::default(),
                data: NodeData::default(),
            }],
            edges: vec![sample_edge().normalized()],
        };
        let text = serde_json::to_string(&graph).unwrap();
        let back: PipelineGraph = serde_json::from_str(&text).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn assignment_preserves_insertion_order() {
        let mut assignment = Assignment::new();
        assignment.insert("b".into(), "1".into());
        assignment.insert("a".into(), "2".into());
        let text = serde_json::to_string(&assignment).unwrap();
        assert_eq!(text, r#"{"b":"1","a":"2"}"#);
    }
}
