//! Lifecycle events and their fan-out to player connections.
//!
//! The core never talks to the transport directly. Components emit a
//! [`LifecycleEvent`] aimed at one connection, and the [`EventNotifier`]
//! forwards it over that connection's channel. The transport
//! collaborator registers a channel per connection at accept time and
//! drains it into whatever wire encoding it uses.
//!
//! Events are an enumerated sum type, so every emitter and handler is
//! checked by the compiler — there is no string-keyed callback registry
//! to typo.

mod notifier;

use gridfall_game::GameSnapshot;
use gridfall_player::PlayerProfile;
use gridfall_protocol::{GameId, PlayerId, PublicId};
use serde::{Deserialize, Serialize};

pub use notifier::EventNotifier;

/// The offending values reported in an invalid-credentials event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CredentialFault {
    /// The socket/identity triple did not match the stored record.
    Identity {
        claimed_player: PlayerId,
        claimed_public: PublicId,
    },
    /// The claimed player is not a member of the named session.
    Membership { game_id: GameId },
}

/// Everything the core can tell a client about session lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A batch formed; the player must confirm readiness for this game.
    ReadyCheck {
        player_id: PlayerId,
        game_id: GameId,
    },
    /// A readiness confirmation carried credentials that do not match
    /// the authoritative record. `valid` is that record when known.
    InvalidCredentials {
        invalid: CredentialFault,
        valid: Option<PlayerProfile>,
    },
    /// All players confirmed; the session is live.
    GameStart { game: GameSnapshot },
    /// A new round began.
    RoundStart { game: GameSnapshot },
    /// The session ended.
    GameEnd { game: GameSnapshot },
}

impl LifecycleEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadyCheck { .. } => "ready_check",
            Self::InvalidCredentials { .. } => "invalid_credentials",
            Self::GameStart { .. } => "game_start",
            Self::RoundStart { .. } => "round_start",
            Self::GameEnd { .. } => "game_end",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_check_json_shape() {
        let event = LifecycleEvent::ReadyCheck {
            player_id: PlayerId::new(),
            game_id: GameId::new(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ready_check");
        assert!(json["player_id"].is_string());
        assert!(json["game_id"].is_string());
    }

    #[test]
    fn test_invalid_credentials_membership_shape() {
        let event = LifecycleEvent::InvalidCredentials {
            invalid: CredentialFault::Membership {
                game_id: GameId::new(),
            },
            valid: None,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "invalid_credentials");
        assert_eq!(json["invalid"]["kind"], "membership");
        assert!(json["valid"].is_null());
    }

    #[test]
    fn test_event_names() {
        let event = LifecycleEvent::ReadyCheck {
            player_id: PlayerId::new(),
            game_id: GameId::new(),
        };
        assert_eq!(event.name(), "ready_check");
    }
}
