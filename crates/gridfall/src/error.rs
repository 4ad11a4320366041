//! Unified error type for the Gridfall backend.

use gridfall_game::GameError;
use gridfall_lobby::LobbyError;
use gridfall_matchmaking::MatchmakingError;
use gridfall_player::PlayerError;
use gridfall_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gridfall` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GridfallError {
    /// A key-value or profile store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A player identity or profile error.
    #[error(transparent)]
    Player(#[from] PlayerError),

    /// A game record or state-machine error.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A lobby pool or admission-lock error.
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A batch formation or handshake error.
    #[error(transparent)]
    Matchmaking(#[from] MatchmakingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Backend("cache down".into());
        let top: GridfallError = err.into();
        assert!(matches!(top, GridfallError::Store(_)));
        assert!(top.to_string().contains("cache down"));
    }

    #[test]
    fn test_from_player_error() {
        let err = PlayerError::Incomplete("username".into());
        let top: GridfallError = err.into();
        assert!(matches!(top, GridfallError::Player(_)));
    }

    #[test]
    fn test_from_matchmaking_error() {
        let err = MatchmakingError::LockTimeout;
        let top: GridfallError = err.into();
        assert!(matches!(top, GridfallError::Matchmaking(_)));
        assert!(top.to_string().contains("lock"));
    }

    #[test]
    fn test_from_game_error() {
        let err = GameError::NotFound(gridfall_protocol::GameId::new());
        let top: GridfallError = err.into();
        assert!(matches!(top, GridfallError::Game(_)));
    }
}
