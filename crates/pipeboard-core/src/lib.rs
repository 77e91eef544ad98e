pub mod error;
pub mod model;
pub mod resolve;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use error::CoreError;
pub use model::{
    Assignment, Candidate, Connection, Edge, EdgeData, Node, NodeData, PipelineGraph, Port,
    PortLink, Position,
};
pub use resolve::{build_assignment, resolve_edge_context, AssignmentDraft, EdgeContext};
pub use store::GraphStore;
pub use validate::{structure_report, validate_assignment, StructureIssue};
