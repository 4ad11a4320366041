//! The player service: load-or-create, credential checks, disconnects.

use gridfall_protocol::{PlayerId, PublicId, SocketId};
use gridfall_store::{KvStore, ProfileStore};
use tracing::{info, warn};

use crate::{PlayerError, PlayerProfile, PlayerRepository};

/// Service facade over [`PlayerRepository`], used by the gateway and
/// the matchmaker.
#[derive(Clone)]
pub struct PlayerService<K, P> {
    repo: PlayerRepository<K, P>,
}

impl<K: KvStore, P: ProfileStore> PlayerService<K, P> {
    pub fn new(repo: PlayerRepository<K, P>) -> Self {
        Self { repo }
    }

    /// Loads an existing profile or creates a fresh one.
    ///
    /// `raw_id` is whatever the client claims its player id to be. Only
    /// a well-formed UUID that resolves to a stored profile counts as a
    /// returning player; anything else (including `None` and garbage
    /// strings) produces a new profile. Returning players get their
    /// connection handle and username refreshed.
    pub async fn load_player(
        &self,
        raw_id: Option<&str>,
        socket_id: SocketId,
        username: &str,
    ) -> Result<PlayerProfile, PlayerError> {
        let existing = match raw_id.and_then(PlayerId::parse) {
            Some(id) => self.repo.get_by_id(id).await?,
            None => None,
        };

        let player = match existing {
            Some(mut player) => {
                if player.socket_id != socket_id {
                    player.socket_id = socket_id;
                }
                if player.username != username {
                    player.username = username.to_owned();
                }
                info!(player_id = %player.id, "returning player loaded");
                player
            }
            None => {
                let player = PlayerProfile::new(socket_id, username);
                info!(player_id = %player.id, "new player created");
                player
            }
        };

        self.repo.save(&player).await?;
        Ok(player)
    }

    /// Checks a transport-reported triple against the identity map.
    ///
    /// True only when an identity record exists for the connection and
    /// both claimed ids match it. A mismatch is a validation failure,
    /// not an error.
    pub async fn validate_credentials(
        &self,
        socket_id: &SocketId,
        player_id: PlayerId,
        public_id: PublicId,
    ) -> Result<bool, PlayerError> {
        let Some(record) = self.repo.identity_by_socket(socket_id).await?
        else {
            return Ok(false);
        };
        Ok(record.id == player_id && record.public_id == public_id)
    }

    /// Looks up the full profile behind a connection handle.
    pub async fn by_socket_id(
        &self,
        socket_id: &SocketId,
    ) -> Result<Option<PlayerProfile>, PlayerError> {
        self.repo.get_by_socket(socket_id).await
    }

    /// Looks up the full profile behind a public id.
    pub async fn by_public_id(
        &self,
        public_id: PublicId,
    ) -> Result<Option<PlayerProfile>, PlayerError> {
        self.repo.get_by_public(public_id).await
    }

    /// Looks up a profile by private id.
    pub async fn get(
        &self,
        player_id: PlayerId,
    ) -> Result<Option<PlayerProfile>, PlayerError> {
        self.repo.get_by_id(player_id).await
    }

    /// Persists an updated profile.
    pub async fn update(
        &self,
        player: &PlayerProfile,
    ) -> Result<(), PlayerError> {
        self.repo.save(player).await
    }

    /// Clears the identity mapping for a departed connection. The
    /// durable profile survives so the player can return later.
    pub async fn disconnected(
        &self,
        socket_id: &SocketId,
    ) -> Result<(), PlayerError> {
        match self.repo.identity_by_socket(socket_id).await? {
            Some(record) => {
                self.repo.delete_identity(&record).await?;
                info!(player_id = %record.id, "identity cleared on disconnect");
            }
            None => {
                warn!(%socket_id, "disconnect for unknown connection");
            }
        }
        Ok(())
    }
}
