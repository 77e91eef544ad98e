//! HTTP facade over the pipeline backend.
//!
//! Exposes the backend query/command/event surface as a REST API so remote
//! editor sessions (via `pipeboard_backend::HttpBackend`) can hydrate, apply,
//! relay structural edits, and long-poll for graph-changed notifications.
//! This crate contains the server framework, error mapping, and route
//! definitions; pipeline semantics live in `pipeboard_backend`.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
