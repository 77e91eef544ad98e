//! Backend error types.

use thiserror::Error;

/// Errors produced by backend command/query calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// An edge id named by a command does not exist on the backend.
    #[error("edge not found: '{id}'")]
    EdgeNotFound { id: String },

    /// A node id named by a command does not exist on the backend.
    #[error("node not found: '{id}'")]
    NodeNotFound { id: String },

    /// A create-node command named a kind absent from the candidate catalog.
    #[error("unknown node kind: '{kind}'")]
    UnknownKind { kind: String },

    /// The HTTP transport failed (connection, timeout, body decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },
}
