//! Backend contract for the pipeline editor.
//!
//! The backend is the source of truth for the pipeline graph. This crate
//! defines the query/command/event surface the editor consumes
//! ([`PipelineBackend`]), the change-notification subscription type, and two
//! implementations: [`InMemoryBackend`] (first-class for tests and embedded
//! use) and [`HttpBackend`] (a remote backend over its HTTP facade).

pub mod error;
pub mod events;
pub mod http;
pub mod memory;
pub mod protocol;
pub mod traits;

pub use error::BackendError;
pub use events::{ChangeBus, Subscription};
pub use http::HttpBackend;
pub use memory::{InMemoryBackend, NodeTemplate, PortSpec};
pub use traits::PipelineBackend;
