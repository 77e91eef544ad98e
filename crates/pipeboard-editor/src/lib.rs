//! The graph synchronization and edit-reconciliation engine.
//!
//! [`EditorSession`] holds the locally editable copy of the pipeline graph,
//! resolves structural edit intents against port definitions, relays
//! connect/disconnect/assignment edits to the backend immediately, batches
//! everything else until an explicit apply, and re-hydrates from the backend
//! on every graph-changed notification.

pub mod error;
pub mod lifecycle;
pub mod session;

pub use error::EditorError;
pub use lifecycle::{EdgeGesture, GesturePhase};
pub use session::EditorSession;
