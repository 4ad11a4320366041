//! Batch matchmaking for Gridfall.
//!
//! The [`Matchmaker`] consumes the lobby and the game service to form
//! four-player batches, run the readiness handshake, and compensate when
//! the handshake times out:
//!
//! ```text
//! try_matchmake
//!   ├─ wait for the admission lock (bounded polls, else LockTimeout)
//!   ├─ fewer than 4 waiting → not ready, no side effects
//!   └─ exactly 4 → lock, create game, drain the four from the lobby,
//!        emit a ready-check each, wait once, then either
//!        ├─ all confirmed → game starts (via confirm_ready)
//!        └─ timeout → requeue all four, destroy the game
//! ```
//!
//! [`GameService`] wraps game persistence with event emission; it is
//! what actually starts a game once the last confirmation lands.

mod config;
mod error;
mod game_service;
mod matchmaker;

pub use config::MatchConfig;
pub use error::MatchmakingError;
pub use game_service::GameService;
pub use matchmaker::Matchmaker;
