//! Worker error types.

use crate::worker::WorkerState;
use grammly_core::Error as StoreError;

/// Errors from the offline asset worker.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// A lifecycle event arrived in the wrong state. The host serializes
    /// install, activate, and fetch, so this indicates driver misuse.
    #[error("invalid lifecycle event: {event} while {state:?}")]
    InvalidState { event: &'static str, state: WorkerState },

    /// A manifest entry or request target could not be resolved against the
    /// worker scope.
    #[error("invalid asset URL {url}: {reason}")]
    InvalidAssetUrl { url: String, reason: String },

    /// Precaching an asset failed during install. The whole install aborts,
    /// as with `cache.addAll`.
    #[error("precache failed for {url}: {reason}")]
    PrecacheFailed { url: String, reason: String },

    /// Cache store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Cache miss with the network down and no cached offline document.
    #[error("cannot serve {0}: not cached, network unavailable, offline fallback not cached")]
    FallbackUnavailable(String),
}
