//! The hash-oriented key-value cache contract and its in-memory form.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::StoreError;

/// A shared cache of named hashes, each mapping field names to string
/// values. This mirrors the per-key atomicity of the real backend: each
/// call touches exactly one field (or one whole hash), and there are no
/// multi-key transactions.
///
/// Values are opaque strings; callers serialize their records (JSON)
/// before writing. Implementations must be cheap to clone or shared via
/// `Arc`, since several independent flows hold the same store.
///
/// The futures are `Send` because callers run store operations inside
/// spawned tasks (matchmaking attempts are detached from the request
/// that triggered them).
pub trait KvStore: Send + Sync + 'static {
    /// Sets one field of a named hash, overwriting any previous value.
    fn set_field(
        &self,
        hash: &str,
        field: &str,
        value: String,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Reads one field of a named hash. `None` if the hash or field
    /// does not exist.
    fn get_field(
        &self,
        hash: &str,
        field: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Reads every field of a named hash. An unknown hash yields an
    /// empty list, not an error.
    fn get_all_fields(
        &self,
        hash: &str,
    ) -> impl std::future::Future<Output = Result<Vec<(String, String)>, StoreError>> + Send;

    /// Deletes one field of a named hash. Deleting a missing field is
    /// a no-op.
    fn delete_field(
        &self,
        hash: &str,
        field: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// In-memory [`KvStore`] backed by a mutex-guarded map of maps.
///
/// The mutex is never held across an await point, so sharing this across
/// interleaved flows on the same runtime cannot deadlock.
#[derive(Clone, Default)]
pub struct MemoryKv {
    hashes: Arc<Mutex<HashMap<String, HashMap<String, String>>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    async fn set_field(
        &self,
        hash: &str,
        field: &str,
        value: String,
    ) -> Result<(), StoreError> {
        let mut hashes = self.hashes.lock().expect("kv mutex poisoned");
        hashes
            .entry(hash.to_owned())
            .or_default()
            .insert(field.to_owned(), value);
        Ok(())
    }

    async fn get_field(
        &self,
        hash: &str,
        field: &str,
    ) -> Result<Option<String>, StoreError> {
        let hashes = self.hashes.lock().expect("kv mutex poisoned");
        Ok(hashes.get(hash).and_then(|h| h.get(field)).cloned())
    }

    async fn get_all_fields(
        &self,
        hash: &str,
    ) -> Result<Vec<(String, String)>, StoreError> {
        let hashes = self.hashes.lock().expect("kv mutex poisoned");
        Ok(hashes
            .get(hash)
            .map(|h| {
                h.iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_field(
        &self,
        hash: &str,
        field: &str,
    ) -> Result<(), StoreError> {
        let mut hashes = self.hashes.lock().expect("kv mutex poisoned");
        if let Some(h) = hashes.get_mut(hash) {
            h.remove(field);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get_returns_value() {
        let kv = MemoryKv::new();
        kv.set_field("lobby", "p1", "data".into()).await.unwrap();

        let value = kv.get_field("lobby", "p1").await.unwrap();
        assert_eq!(value.as_deref(), Some("data"));
    }

    #[tokio::test]
    async fn test_get_missing_field_returns_none() {
        let kv = MemoryKv::new();
        assert!(kv.get_field("lobby", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let kv = MemoryKv::new();
        kv.set_field("game", "g1", "old".into()).await.unwrap();
        kv.set_field("game", "g1", "new".into()).await.unwrap();

        let value = kv.get_field("game", "g1").await.unwrap();
        assert_eq!(value.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_get_all_fields_returns_every_entry() {
        let kv = MemoryKv::new();
        kv.set_field("lobby", "a", "1".into()).await.unwrap();
        kv.set_field("lobby", "b", "2".into()).await.unwrap();

        let mut fields = kv.get_all_fields("lobby").await.unwrap();
        fields.sort();
        assert_eq!(
            fields,
            vec![("a".into(), "1".into()), ("b".into(), "2".into())]
        );
    }

    #[tokio::test]
    async fn test_get_all_fields_unknown_hash_is_empty() {
        let kv = MemoryKv::new();
        assert!(kv.get_all_fields("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_field_removes_only_that_field() {
        let kv = MemoryKv::new();
        kv.set_field("lobby", "a", "1".into()).await.unwrap();
        kv.set_field("lobby", "b", "2".into()).await.unwrap();

        kv.delete_field("lobby", "a").await.unwrap();

        assert!(kv.get_field("lobby", "a").await.unwrap().is_none());
        assert!(kv.get_field("lobby", "b").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_field_is_noop() {
        let kv = MemoryKv::new();
        kv.delete_field("lobby", "ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_hashes_are_independent() {
        let kv = MemoryKv::new();
        kv.set_field("lobby", "x", "in-lobby".into()).await.unwrap();
        kv.set_field("game", "x", "in-game".into()).await.unwrap();

        assert_eq!(
            kv.get_field("lobby", "x").await.unwrap().as_deref(),
            Some("in-lobby")
        );
        assert_eq!(
            kv.get_field("game", "x").await.unwrap().as_deref(),
            Some("in-game")
        );
    }
}
