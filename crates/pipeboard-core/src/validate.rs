//! Assignment validation and structural diagnostics.
//!
//! [`validate_assignment`] enforces the assignment-range invariants before an
//! assignment is committed. [`structure_report`] is advisory: it surfaces dangling
//! endpoints, unknown handles, duplicate ids, and cycles as diagnostics a
//! host can display. Cycles are permitted in the pipeline graph; nothing in
//! this crate rejects a cyclic snapshot.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use serde::Serialize;
use thiserror::Error;

use crate::error::CoreError;
use crate::model::{Assignment, PipelineGraph, Port};

/// Checks an assignment against the resolved endpoint ports.
///
/// Every key must be a property of `target_port` and every value a
/// property of `source_port`. Unassigned target properties may be
/// absent from the map; that is not an error.
pub fn validate_assignment(
    assignment: &Assignment,
    source_port: &Port,
    target_port: &Port,
) -> Result<(), CoreError> {
    for (key, value) in assignment {
        if !target_port.has_property(key) {
            return Err(CoreError::AssignmentKeyOutOfRange {
                key: key.clone(),
                port: target_port.name.clone(),
            });
        }
        if !source_port.has_property(value) {
            return Err(CoreError::AssignmentValueOutOfRange {
                value: value.clone(),
                port: source_port.name.clone(),
            });
        }
    }
    Ok(())
}

/// A non-blocking structural finding in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StructureIssue {
    /// An edge's `source` names no node in the snapshot.
    #[error("edge '{edge}' has dangling source node '{node}'")]
    DanglingSource { edge: String, node: String },

    /// An edge's `target` names no node in the snapshot.
    #[error("edge '{edge}' has dangling target node '{node}'")]
    DanglingTarget { edge: String, node: String },

    /// An edge's source handle names no output port of its source node.
    #[error("edge '{edge}' source handle '{handle}' is not an output port of '{node}'")]
    UnknownOutputPort {
        edge: String,
        node: String,
        handle: String,
    },

    /// An edge's target handle names no input port of its target node.
    #[error("edge '{edge}' target handle '{handle}' is not an input port of '{node}'")]
    UnknownInputPort {
        edge: String,
        node: String,
        handle: String,
    },

    /// Two nodes share an id.
    #[error("duplicate node id '{node}'")]
    DuplicateNodeId { node: String },

    /// Two edges share an id.
    #[error("duplicate edge id '{edge}'")]
    DuplicateEdgeId { edge: String },

    /// A set of nodes forms a directed cycle.
    #[error("cycle through nodes {nodes:?}")]
    Cycle { nodes: Vec<String> },
}

/// Reports structural findings over a snapshot.
///
/// Edges with dangling endpoints are excluded from cycle analysis; a
/// self-loop counts as a cycle of one node.
pub fn structure_report(graph: &PipelineGraph) -> Vec<StructureIssue> {
    let mut issues = Vec::new();

    let mut seen_nodes = std::collections::HashSet::new();
    for node in &graph.nodes {
        if !seen_nodes.insert(node.id.as_str()) {
            issues.push(StructureIssue::DuplicateNodeId {
                node: node.id.clone(),
            });
        }
    }

    let mut seen_edges = std::collections::HashSet::new();
    let mut topology: DiGraphMap<&str, ()> = DiGraphMap::new();
    for node in &graph.nodes {
        topology.add_node(node.id.as_str());
    }

    for edge in &graph.edges {
        if !seen_edges.insert(edge.id.as_str()) {
            issues.push(StructureIssue::DuplicateEdgeId {
                edge: edge.id.clone(),
            });
        }

        let source = graph.nodes.iter().find(|n| n.id == edge.source);
        let target = graph.nodes.iter().find(|n| n.id == edge.target);

        match source {
            None => issues.push(StructureIssue::DanglingSource {
                edge: edge.id.clone(),
                node: edge.source.clone(),
            }),
            Some(node) => {
                let handle = edge.source_handle.clone().unwrap_or_default();
                if node.output(&handle).is_none() {
                    issues.push(StructureIssue::UnknownOutputPort {
                        edge: edge.id.clone(),
                        node: node.id.clone(),
                        handle,
                    });
                }
            }
        }
        match target {
            None => issues.push(StructureIssue::DanglingTarget {
                edge: edge.id.clone(),
                node: edge.target.clone(),
            }),
            Some(node) => {
                let handle = edge.target_handle.clone().unwrap_or_default();
                if node.input(&handle).is_none() {
                    issues.push(StructureIssue::UnknownInputPort {
                        edge: edge.id.clone(),
                        node: node.id.clone(),
                        handle,
                    });
                }
            }
        }

        if source.is_some() && target.is_some() {
            topology.add_edge(edge.source.as_str(), edge.target.as_str(), ());
        }
    }

    for component in tarjan_scc(&topology) {
        let cyclic = component.len() > 1
            || (component.len() == 1
                && topology.contains_edge(component[0], component[0]));
        if cyclic {
            let mut nodes: Vec<String> = component.iter().map(|id| id.to_string()).collect();
            nodes.sort();
            issues.push(StructureIssue::Cycle { nodes });
        }
    }

    issues
}
