//! Error type for the lobby layer.

use gridfall_store::StoreError;

/// Errors that can occur during lobby operations.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// A backing store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A lobby entry could not be encoded.
    #[error("lobby entry codec failure: {0}")]
    Codec(serde_json::Error),
}
