//! Player identity and profile management for Gridfall.
//!
//! This crate owns everything about a player that outlives a single
//! session:
//!
//! 1. **Profile model** — [`PlayerProfile`] (server-side, with the
//!    connection handle) and its session-scoped projection
//!    [`GamePlayer`] (what peers are allowed to see), plus the
//!    points-to-rank ladder.
//! 2. **Repository** — [`PlayerRepository`] splits a profile between the
//!    durable store (allow-listed fields only) and the identity-lookup
//!    hashes in the shared cache.
//! 3. **Service** — [`PlayerService`] is what the gateway and matchmaker
//!    call: load-or-create on join, credential validation on readiness
//!    confirmation, cleanup on disconnect.

mod error;
mod profile;
mod repository;
mod service;

pub use error::PlayerError;
pub use profile::{GamePlayer, PlayerProfile, rank_for_points};
pub use repository::{IdentityRecord, PlayerRepository};
pub use service::PlayerService;
