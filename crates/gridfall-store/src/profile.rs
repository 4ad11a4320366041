//! The durable player-profile store contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use gridfall_protocol::{PlayerId, PublicId};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// The allow-listed field set persisted for a player.
///
/// This is deliberately narrower than the session-scoped player view:
/// no connection handle, no readiness flag, no in-round gameplay state.
/// Anything not in this record does not survive a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub id: PlayerId,
    pub public_id: PublicId,
    pub username: String,
    pub points: i32,
    pub rank: String,
    pub total_games: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Long-lived player records, keyed by private player id.
///
/// Futures are `Send` for the same reason as [`crate::KvStore`]'s:
/// profile lookups happen inside detached matchmaking tasks.
pub trait ProfileStore: Send + Sync + 'static {
    /// Writes (or overwrites) one profile record.
    fn put(
        &self,
        profile: StoredProfile,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Fetches a profile by private id. `None` for unknown players.
    fn get(
        &self,
        id: PlayerId,
    ) -> impl std::future::Future<Output = Result<Option<StoredProfile>, StoreError>> + Send;

    /// Deletes a profile. Deleting an unknown id is a no-op.
    fn delete(
        &self,
        id: PlayerId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// In-memory [`ProfileStore`].
#[derive(Clone, Default)]
pub struct MemoryProfiles {
    records: Arc<Mutex<HashMap<PlayerId, StoredProfile>>>,
}

impl MemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfiles {
    async fn put(&self, profile: StoredProfile) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("profile mutex poisoned");
        records.insert(profile.id, profile);
        Ok(())
    }

    async fn get(
        &self,
        id: PlayerId,
    ) -> Result<Option<StoredProfile>, StoreError> {
        let records = self.records.lock().expect("profile mutex poisoned");
        Ok(records.get(&id).cloned())
    }

    async fn delete(&self, id: PlayerId) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("profile mutex poisoned");
        records.remove(&id);
        Ok(())
    }
}
