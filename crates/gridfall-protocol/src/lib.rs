//! Shared identity types and transport reply shapes for Gridfall.
//!
//! This crate defines the "language" the matchmaking core and the
//! transport collaborator speak to each other:
//!
//! - **Identity** ([`PlayerId`], [`PublicId`], [`GameId`], [`SocketId`]) —
//!   newtype wrappers so a public identifier can never be passed where a
//!   private one is expected.
//! - **Replies** ([`LobbyJoined`], [`JoinReply`]) — the status payloads the
//!   gateway sends back for inbound operations.
//!
//! It sits at the bottom of the stack: every other Gridfall crate depends
//! on it, and it depends on nothing but serde and uuid.

mod ids;
mod messages;

pub use ids::{GameId, PlayerId, PublicId, SocketId};
pub use messages::{JoinReply, LobbyJoined};
