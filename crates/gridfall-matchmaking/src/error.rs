//! Error types for the matchmaking layer.

use gridfall_game::GameError;
use gridfall_lobby::LobbyError;
use gridfall_player::PlayerError;

/// Errors that can occur while forming or confirming a batch.
#[derive(Debug, thiserror::Error)]
pub enum MatchmakingError {
    /// The admission lock stayed set through the whole poll budget.
    /// The attempt is aborted, not retried.
    #[error("admission lock held too long")]
    LockTimeout,

    /// A lobby operation failed.
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A game operation failed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A player operation failed.
    #[error(transparent)]
    Player(#[from] PlayerError),
}
