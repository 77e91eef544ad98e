//! Request/response body types shared by the HTTP facade and its client.
//!
//! Kept in one place so [`crate::HttpBackend`] and the server speak a single
//! protocol definition.

use pipeboard_core::{Assignment, Position};
use serde::{Deserialize, Serialize};

/// Body of `POST /pipeline/nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNodeRequest {
    pub kind: String,
    #[serde(default)]
    pub position: Position,
}

/// Body of `PUT /pipeline/edges/{id}/assignment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetAssignmentRequest {
    #[serde(default)]
    pub assignment: Assignment,
}

/// Body of a `200 OK` answer from `GET /pipeline/events`.
///
/// `version` increases monotonically with every backend mutation; clients
/// pass it back as `?since=` so a change landing between two polls is not
/// missed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EventTick {
    pub version: u64,
}
