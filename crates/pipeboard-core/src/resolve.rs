//! Port resolution and assignment drafting.
//!
//! [`resolve_edge_context`] locates an edge's endpoint nodes and the specific
//! output/input port definitions its handles name. Any lookup miss -- edge,
//! either node, or either port -- returns `None` with no side effect. Callers
//! rely on that contract to avoid opening an edit context on stale data, such
//! as an edge whose endpoint node was just deleted by a canonical re-fetch.

use crate::model::{Assignment, Edge, Port};
use crate::store::GraphStore;

/// A resolved edge together with its endpoint port definitions.
///
/// Guarantees `source_port.name == edge.source_handle` and
/// `target_port.name == edge.target_handle`.
#[derive(Debug, Clone, Copy)]
pub struct EdgeContext<'a> {
    pub edge: &'a Edge,
    pub source_port: &'a Port,
    pub target_port: &'a Port,
}

/// Resolves an edge id against the store.
///
/// Fails silently (returns `None`) if the edge, either endpoint node, or
/// either named port cannot be found.
pub fn resolve_edge_context<'a>(store: &'a GraphStore, edge_id: &str) -> Option<EdgeContext<'a>> {
    let edge = store.edge(edge_id)?;
    let source = store.node(&edge.source)?;
    let target = store.node(&edge.target)?;
    let source_port = source.output(edge.source_handle.as_deref()?)?;
    let target_port = target.input(edge.target_handle.as_deref()?)?;
    Some(EdgeContext {
        edge,
        source_port,
        target_port,
    })
}

/// One assignable slot of an [`AssignmentDraft`]: a target-port property,
/// the source-port properties offered as values, and the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSlot {
    pub property: String,
    pub candidates: Vec<String>,
    pub selected: Option<String>,
}

/// An editable working copy of an edge's assignment, one slot per target
/// property. Built for UI consumption; never touches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft {
    pub slots: Vec<AssignmentSlot>,
}

impl AssignmentDraft {
    /// Collapses the draft back into an [`Assignment`]; unselected slots are
    /// simply absent from the map.
    pub fn assignment(&self) -> Assignment {
        self.slots
            .iter()
            .filter_map(|slot| {
                slot.selected
                    .as_ref()
                    .map(|value| (slot.property.clone(), value.clone()))
            })
            .collect()
    }

    /// Sets the selection for one slot. Returns `false` if the draft has no
    /// such property or the value is not among the slot's candidates.
    pub fn select(&mut self, property: &str, value: Option<String>) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| s.property == property) else {
            return false;
        };
        if let Some(value) = &value {
            if !slot.candidates.iter().any(|c| c == value) {
                return false;
            }
        }
        slot.selected = value;
        true
    }
}

/// Enumerates the target port's properties as assignable slots, each offered
/// the source port's properties as candidate values and seeded from
/// `existing` where present.
pub fn build_assignment(
    target_port: &Port,
    source_port: &Port,
    existing: &Assignment,
) -> AssignmentDraft {
    let slots = target_port
        .property_names
        .iter()
        .map(|property| AssignmentSlot {
            property: property.clone(),
            candidates: source_port.property_names.clone(),
            selected: existing.get(property).cloned(),
        })
        .collect();
    AssignmentDraft { slots }
}
