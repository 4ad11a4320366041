//! Error types for the player layer.

use gridfall_store::StoreError;

/// Errors that can occur during profile or identity operations.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// A backing store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A profile was missing a required field before save.
    #[error("profile is missing required fields: {0}")]
    Incomplete(String),

    /// An identity record could not be encoded or decoded.
    #[error("identity record codec failure: {0}")]
    Codec(serde_json::Error),
}
