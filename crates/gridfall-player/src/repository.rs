//! Player persistence: durable profiles plus identity-lookup hashes.
//!
//! A profile is split across the two collaborators. The durable store
//! keeps the allow-listed [`StoredProfile`] record. The shared cache
//! keeps three small lookup hashes, each mapping one kind of identifier
//! to the same [`IdentityRecord`], so any of the three ids resolves to
//! the other two in one read.

use chrono::Utc;
use gridfall_protocol::{PlayerId, PublicId, SocketId};
use gridfall_store::{KvStore, ProfileStore, StoredProfile};
use serde::{Deserialize, Serialize};

use crate::{PlayerError, PlayerProfile, profile::STARTING_HEALTH};

/// Identity-lookup hash keyed by private player id.
const IDS_BY_PLAYER: &str = "ids_by_player";
/// Identity-lookup hash keyed by connection handle.
const IDS_BY_SOCKET: &str = "ids_by_socket";
/// Identity-lookup hash keyed by public id.
const IDS_BY_PUBLIC: &str = "ids_by_public";

/// The triple mirrored into each identity-lookup hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: PlayerId,
    pub public_id: PublicId,
    pub socket_id: SocketId,
}

/// Repository over the durable profile store and the identity hashes.
#[derive(Clone)]
pub struct PlayerRepository<K, P> {
    kv: K,
    profiles: P,
}

impl<K: KvStore, P: ProfileStore> PlayerRepository<K, P> {
    pub fn new(kv: K, profiles: P) -> Self {
        Self { kv, profiles }
    }

    /// Saves a profile: the allow-listed record goes to the durable
    /// store, the identity triple into all three lookup hashes.
    pub async fn save(
        &self,
        player: &PlayerProfile,
    ) -> Result<(), PlayerError> {
        if player.username.is_empty() {
            return Err(PlayerError::Incomplete("username".into()));
        }

        let record = StoredProfile {
            id: player.id,
            public_id: player.public_id,
            username: player.username.clone(),
            points: player.points,
            rank: player.rank.clone(),
            total_games: player.total_games,
            created_at: player.created_at,
            updated_at: Utc::now(),
        };
        self.profiles.put(record).await?;

        self.store_identity(&IdentityRecord {
            id: player.id,
            public_id: player.public_id,
            socket_id: player.socket_id.clone(),
        })
        .await
    }

    /// Fetches a profile by private id, reconstituting session-scoped
    /// fields at their defaults and the connection handle from the
    /// identity hash (empty when the player is offline).
    pub async fn get_by_id(
        &self,
        id: PlayerId,
    ) -> Result<Option<PlayerProfile>, PlayerError> {
        let Some(stored) = self.profiles.get(id).await? else {
            return Ok(None);
        };

        let socket_id = self
            .identity_by_player(id)
            .await?
            .map(|r| r.socket_id)
            .unwrap_or_default();

        Ok(Some(reconstitute(stored, socket_id)))
    }

    /// Fetches a profile by connection handle via the identity hash.
    pub async fn get_by_socket(
        &self,
        socket_id: &SocketId,
    ) -> Result<Option<PlayerProfile>, PlayerError> {
        match self.identity_by_socket(socket_id).await? {
            Some(record) => self.get_by_id(record.id).await,
            None => Ok(None),
        }
    }

    /// Fetches a profile by public id via the identity hash.
    pub async fn get_by_public(
        &self,
        public_id: PublicId,
    ) -> Result<Option<PlayerProfile>, PlayerError> {
        match self.identity_by_public(public_id).await? {
            Some(record) => self.get_by_id(record.id).await,
            None => Ok(None),
        }
    }

    /// Reads the identity triple for a connection handle.
    pub async fn identity_by_socket(
        &self,
        socket_id: &SocketId,
    ) -> Result<Option<IdentityRecord>, PlayerError> {
        self.read_identity(IDS_BY_SOCKET, socket_id.as_str()).await
    }

    /// Reads the identity triple for a private player id.
    pub async fn identity_by_player(
        &self,
        id: PlayerId,
    ) -> Result<Option<IdentityRecord>, PlayerError> {
        self.read_identity(IDS_BY_PLAYER, &id.0.to_string()).await
    }

    /// Reads the identity triple for a public id.
    pub async fn identity_by_public(
        &self,
        public_id: PublicId,
    ) -> Result<Option<IdentityRecord>, PlayerError> {
        self.read_identity(IDS_BY_PUBLIC, &public_id.0.to_string())
            .await
    }

    /// Removes the identity triple from all three lookup hashes.
    /// Called on disconnect; the durable profile is left in place.
    pub async fn delete_identity(
        &self,
        record: &IdentityRecord,
    ) -> Result<(), PlayerError> {
        self.kv
            .delete_field(IDS_BY_PLAYER, &record.id.0.to_string())
            .await?;
        self.kv
            .delete_field(IDS_BY_SOCKET, record.socket_id.as_str())
            .await?;
        self.kv
            .delete_field(IDS_BY_PUBLIC, &record.public_id.0.to_string())
            .await?;
        Ok(())
    }

    /// Deletes a player entirely: identity triple and durable record.
    pub async fn delete(&self, id: PlayerId) -> Result<(), PlayerError> {
        if let Some(record) = self.identity_by_player(id).await? {
            self.delete_identity(&record).await?;
        }
        self.profiles.delete(id).await?;
        Ok(())
    }

    async fn store_identity(
        &self,
        record: &IdentityRecord,
    ) -> Result<(), PlayerError> {
        let json =
            serde_json::to_string(record).map_err(PlayerError::Codec)?;
        self.kv
            .set_field(IDS_BY_PLAYER, &record.id.0.to_string(), json.clone())
            .await?;
        self.kv
            .set_field(IDS_BY_SOCKET, record.socket_id.as_str(), json.clone())
            .await?;
        self.kv
            .set_field(IDS_BY_PUBLIC, &record.public_id.0.to_string(), json)
            .await?;
        Ok(())
    }

    async fn read_identity(
        &self,
        hash: &str,
        field: &str,
    ) -> Result<Option<IdentityRecord>, PlayerError> {
        match self.kv.get_field(hash, field).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(PlayerError::Codec),
            None => Ok(None),
        }
    }
}

/// Rebuilds the in-session profile shape from the durable record.
/// Session-scoped fields come back at their entry defaults.
fn reconstitute(stored: StoredProfile, socket_id: SocketId) -> PlayerProfile {
    PlayerProfile {
        id: stored.id,
        public_id: stored.public_id,
        socket_id,
        username: stored.username,
        ready: false,
        created_at: stored.created_at,
        updated_at: stored.updated_at,
        rank: stored.rank,
        points: stored.points,
        total_games: stored.total_games,
        health: STARTING_HEALTH,
        passive_abilities: Vec::new(),
        current_ability: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use gridfall_store::{MemoryKv, MemoryProfiles};

    use super::*;

    fn repo() -> PlayerRepository<MemoryKv, MemoryProfiles> {
        PlayerRepository::new(MemoryKv::new(), MemoryProfiles::new())
    }

    #[tokio::test]
    async fn test_save_then_get_by_id_round_trips() {
        let repo = repo();
        let player = PlayerProfile::new(SocketId::new("s1"), "ada");
        repo.save(&player).await.unwrap();

        let found = repo.get_by_id(player.id).await.unwrap().unwrap();
        assert_eq!(found.id, player.id);
        assert_eq!(found.public_id, player.public_id);
        assert_eq!(found.socket_id, SocketId::new("s1"));
        assert_eq!(found.username, "ada");
    }

    #[tokio::test]
    async fn test_save_rejects_empty_username() {
        let repo = repo();
        let player = PlayerProfile::new(SocketId::new("s1"), "");

        let result = repo.save(&player).await;
        assert!(matches!(result, Err(PlayerError::Incomplete(_))));
    }

    #[tokio::test]
    async fn test_all_three_identity_lookups_resolve() {
        let repo = repo();
        let player = PlayerProfile::new(SocketId::new("s1"), "ada");
        repo.save(&player).await.unwrap();

        let by_socket = repo
            .get_by_socket(&player.socket_id)
            .await
            .unwrap()
            .unwrap();
        let by_public =
            repo.get_by_public(player.public_id).await.unwrap().unwrap();

        assert_eq!(by_socket.id, player.id);
        assert_eq!(by_public.id, player.id);
    }

    #[tokio::test]
    async fn test_get_by_socket_unknown_returns_none() {
        let repo = repo();
        let found = repo.get_by_socket(&SocketId::new("ghost")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_identity_keeps_durable_profile() {
        let repo = repo();
        let player = PlayerProfile::new(SocketId::new("s1"), "ada");
        repo.save(&player).await.unwrap();

        let record = repo
            .identity_by_socket(&player.socket_id)
            .await
            .unwrap()
            .unwrap();
        repo.delete_identity(&record).await.unwrap();

        // Lookups through the identity maps go dark...
        assert!(repo
            .get_by_socket(&player.socket_id)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .identity_by_public(player.public_id)
            .await
            .unwrap()
            .is_none());

        // ...but the durable record is still there, with no stale socket.
        let found = repo.get_by_id(player.id).await.unwrap().unwrap();
        assert_eq!(found.socket_id, SocketId::default());
    }

    #[tokio::test]
    async fn test_delete_removes_everything() {
        let repo = repo();
        let player = PlayerProfile::new(SocketId::new("s1"), "ada");
        repo.save(&player).await.unwrap();

        repo.delete(player.id).await.unwrap();

        assert!(repo.get_by_id(player.id).await.unwrap().is_none());
        assert!(repo
            .identity_by_socket(&player.socket_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_reconstituted_profile_resets_session_fields() {
        let repo = repo();
        let mut player = PlayerProfile::new(SocketId::new("s1"), "ada");
        player.ready = true;
        player.health = 40;
        player.current_ability = "la".into();
        repo.save(&player).await.unwrap();

        let found = repo.get_by_id(player.id).await.unwrap().unwrap();
        assert!(!found.ready);
        assert_eq!(found.health, STARTING_HEALTH);
        assert_eq!(found.current_ability, "");
    }
}
