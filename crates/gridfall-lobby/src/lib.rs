//! The lobby: a shared pool of players waiting to be matched, plus the
//! advisory admission lock.
//!
//! Pool membership means "waiting, uncommitted to any session". The pool
//! and the lock live in the same KV hash: player entries are keyed by
//! private player id, the lock sits under its own reserved field. The
//! lock is a cooperative flag, not a mutual-exclusion primitive —
//! matchmaking attempts must check it before claiming players, and a
//! window exists between observing it clear and setting it.

mod error;

use gridfall_player::PlayerProfile;
use gridfall_protocol::PlayerId;
use gridfall_store::KvStore;
use tracing::{debug, warn};

pub use error::LobbyError;

/// KV hash shared by the pool entries and the lock.
const LOBBY_HASH: &str = "lobby";
/// Reserved field for the admission lock. Never a valid player id.
const LOCK_FIELD: &str = "locked";

/// The shared waiting pool.
#[derive(Clone)]
pub struct Lobby<K> {
    kv: K,
}

impl<K: KvStore> Lobby<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Adds one player to the pool, overwriting a previous entry for the
    /// same id.
    pub async fn add(&self, player: &PlayerProfile) -> Result<(), LobbyError> {
        let json =
            serde_json::to_string(player).map_err(LobbyError::Codec)?;
        self.kv
            .set_field(LOBBY_HASH, &player.id.0.to_string(), json)
            .await?;
        debug!(player_id = %player.id, "player added to lobby");
        Ok(())
    }

    /// Adds several players to the pool.
    pub async fn add_many(
        &self,
        players: &[PlayerProfile],
    ) -> Result<(), LobbyError> {
        for player in players {
            self.add(player).await?;
        }
        Ok(())
    }

    /// Lists up to `limit` waiting players (`0` means unbounded).
    ///
    /// The lock field is never a player. Entries that fail to parse are
    /// logged and skipped rather than failing the whole listing.
    pub async fn available(
        &self,
        limit: usize,
    ) -> Result<Vec<PlayerProfile>, LobbyError> {
        let fields = self.kv.get_all_fields(LOBBY_HASH).await?;

        let mut players = Vec::new();
        for (field, value) in fields {
            if field == LOCK_FIELD {
                continue;
            }
            if limit != 0 && players.len() == limit {
                break;
            }
            match serde_json::from_str::<PlayerProfile>(&value) {
                Ok(player) => players.push(player),
                Err(err) => {
                    warn!(%field, %err, "skipping malformed lobby entry");
                }
            }
        }

        Ok(players)
    }

    /// Removes one player from the pool. Unknown ids are a no-op.
    pub async fn remove(&self, player_id: PlayerId) -> Result<(), LobbyError> {
        self.kv
            .delete_field(LOBBY_HASH, &player_id.0.to_string())
            .await?;
        Ok(())
    }

    /// Removes several players from the pool.
    pub async fn remove_many(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<(), LobbyError> {
        for id in player_ids {
            self.remove(*id).await?;
        }
        Ok(())
    }

    /// Sets or clears the admission lock.
    pub async fn set_locked(&self, locked: bool) -> Result<(), LobbyError> {
        self.kv
            .set_field(LOBBY_HASH, LOCK_FIELD, locked.to_string())
            .await?;
        Ok(())
    }

    /// Queries the admission lock. An absent field counts as unlocked.
    pub async fn is_locked(&self) -> Result<bool, LobbyError> {
        let value = self.kv.get_field(LOBBY_HASH, LOCK_FIELD).await?;
        Ok(value.as_deref() == Some("true"))
    }
}
