//! Editor error type composing core and backend failures.

use thiserror::Error;

use pipeboard_backend::BackendError;
use pipeboard_core::CoreError;

/// Errors surfaced by [`crate::EditorSession`] operations.
///
/// A `Backend` error after a local mutation does not imply the mutation was
/// rolled back; connect/disconnect relays are fire-and-forget with respect
/// to the local store.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
