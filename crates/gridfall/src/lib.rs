//! # Gridfall
//!
//! Four-player real-time match orchestration: lobby admission, batch
//! matchmaking with a readiness handshake, per-match grid generation,
//! and lifecycle event fan-out.
//!
//! The transport layer and the production cache/profile backends are
//! external collaborators. The transport drives the [`Gateway`] with
//! decoded inbound messages and drains per-connection event channels;
//! storage plugs in through the [`KvStore`] and [`ProfileStore`]
//! traits.
//!
//! ```rust
//! use gridfall::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let kv = MemoryKv::new();
//! let profiles = MemoryProfiles::new();
//! let lobby = Lobby::new(kv.clone());
//! let players =
//!     PlayerService::new(PlayerRepository::new(kv.clone(), profiles));
//! let notifier = EventNotifier::new();
//! let games = GameService::new(
//!     GameRepository::new(kv),
//!     players.clone(),
//!     notifier.clone(),
//! );
//! let matchmaker = Matchmaker::new(
//!     lobby.clone(),
//!     games,
//!     players.clone(),
//!     notifier.clone(),
//!     MatchConfig::default(),
//! );
//! let gateway = Gateway::new(lobby, players, matchmaker, notifier);
//!
//! let mut events = gateway.connected(SocketId::new("conn-1"));
//! let reply = gateway
//!     .join_lobby(SocketId::new("conn-1"), None, "ada")
//!     .await;
//! # let _ = (reply, &mut events);
//! # }
//! ```

mod error;
mod gateway;

pub use error::GridfallError;
pub use gateway::Gateway;

pub use gridfall_events::{CredentialFault, EventNotifier, LifecycleEvent};
pub use gridfall_game::{GameRepository, GameSnapshot};
pub use gridfall_lobby::Lobby;
pub use gridfall_matchmaking::{GameService, MatchConfig, Matchmaker};
pub use gridfall_player::{PlayerProfile, PlayerRepository, PlayerService};
pub use gridfall_protocol::{
    GameId, JoinReply, LobbyJoined, PlayerId, PublicId, SocketId,
};
pub use gridfall_store::{
    KvStore, MemoryKv, MemoryProfiles, ProfileStore, StoreError,
};

/// One-stop imports for wiring a backend.
pub mod prelude {
    pub use crate::{
        EventNotifier, GameRepository, GameService, Gateway, GridfallError,
        JoinReply, Lobby, LobbyJoined, MatchConfig, Matchmaker, MemoryKv,
        MemoryProfiles, PlayerRepository, PlayerService, SocketId,
    };
}

/// Installs a `tracing` subscriber driven by `RUST_LOG`.
///
/// Call once from the process entry point. Repeated calls are a no-op
/// rather than a panic, so tests can call it freely.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
