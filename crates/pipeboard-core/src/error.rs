//! Core error types for pipeboard-core.
//!
//! Uses `thiserror` for structured, matchable error variants. Lookup misses
//! during edge-context resolution are deliberately *not* errors (the resolver
//! returns `Option`); these variants cover the caller-contract violations
//! that must be rejected before any mutation.

use thiserror::Error;

/// Core errors produced by validation and assignment commits.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An edge could not be resolved to its endpoint nodes and ports.
    ///
    /// Raised only on the assignment-commit path, where proceeding without a
    /// resolved context would leave the assignment unchecked.
    #[error("edge '{id}' cannot be resolved to its endpoint ports")]
    UnresolvableEdge { id: String },

    /// An assignment key is not a property of the target input port.
    #[error("assignment key '{key}' is not a property of input port '{port}'")]
    AssignmentKeyOutOfRange { key: String, port: String },

    /// An assignment value is not a property of the source output port.
    #[error("assignment value '{value}' is not a property of output port '{port}'")]
    AssignmentValueOutOfRange { value: String, port: String },
}
