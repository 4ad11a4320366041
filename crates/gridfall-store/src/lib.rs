//! Persistence collaborator contracts for Gridfall.
//!
//! The matchmaking core talks to two external stores, both consumed
//! through narrow traits defined here:
//!
//! 1. [`KvStore`] — a hash-oriented key-value cache (set/get/delete a
//!    field, fetch all fields of a named hash). The lobby pool, the
//!    admission lock, game records, and the identity-lookup maps all
//!    live behind this interface.
//! 2. [`ProfileStore`] — the durable record store for long-lived player
//!    profiles, written only with the explicit allow-listed field set
//!    captured by [`StoredProfile`].
//!
//! [`MemoryKv`] and [`MemoryProfiles`] are the in-process implementations
//! used by the composition root and every test in the workspace.

mod error;
mod kv;
mod profile;

pub use error::StoreError;
pub use kv::{KvStore, MemoryKv};
pub use profile::{MemoryProfiles, ProfileStore, StoredProfile};
