//! Game snapshot persistence over the shared cache.
//!
//! Each record is a full-snapshot overwrite of one field in the `game`
//! hash, keyed by game id. Readers between a state change and its
//! persisted write may observe the previous snapshot; every mutating
//! operation in the layers above persists before returning.

use gridfall_protocol::GameId;
use gridfall_store::KvStore;
use tracing::error;

use crate::{Game, GameError, GameSnapshot};

/// KV hash holding one field per live game.
const GAME_HASH: &str = "game";

/// Repository for game snapshots.
#[derive(Clone)]
pub struct GameRepository<K> {
    kv: K,
}

impl<K: KvStore> GameRepository<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Persists the full snapshot, overwriting any previous record.
    pub async fn save(
        &self,
        snapshot: &GameSnapshot,
    ) -> Result<(), GameError> {
        let json =
            serde_json::to_string(snapshot).map_err(GameError::Codec)?;
        self.kv
            .set_field(GAME_HASH, &snapshot.id.0.to_string(), json)
            .await
            .inspect_err(|err| {
                error!(game_id = %snapshot.id, %err, "failed to save game");
            })?;
        Ok(())
    }

    /// Loads a game by id. [`GameError::NotFound`] if no record exists.
    pub async fn load(&self, game_id: GameId) -> Result<Game, GameError> {
        let json = self
            .kv
            .get_field(GAME_HASH, &game_id.0.to_string())
            .await?
            .ok_or(GameError::NotFound(game_id))?;

        let snapshot: GameSnapshot =
            serde_json::from_str(&json).map_err(GameError::Codec)?;
        Ok(Game::from_snapshot(snapshot))
    }

    /// Deletes a game record. Unknown ids are a no-op.
    pub async fn delete(&self, game_id: GameId) -> Result<(), GameError> {
        self.kv
            .delete_field(GAME_HASH, &game_id.0.to_string())
            .await?;
        Ok(())
    }
}
