//! Error types for the game layer.

use gridfall_protocol::GameId;
use gridfall_store::StoreError;

/// Errors that can occur during game persistence and lifecycle handling.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// No stored record exists for the given game.
    #[error("game {0} not found")]
    NotFound(GameId),

    /// A backing store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored snapshot could not be encoded or decoded.
    #[error("snapshot codec failure: {0}")]
    Codec(serde_json::Error),
}
