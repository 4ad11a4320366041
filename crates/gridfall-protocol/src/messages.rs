//! Reply shapes for the inbound transport operations.
//!
//! These are the direct responses the gateway hands back to the transport
//! for `join-lobby` and `join-game`. Everything else the core says to a
//! client travels through the event notifier, not through these replies.

use serde::{Deserialize, Serialize};

/// Reply to a `join-lobby` request.
///
/// Generic over the player payload so this crate does not need to know
/// the profile type defined higher in the stack. Internally tagged on
/// `status`, matching the wire convention `{ "status": "success", ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LobbyJoined<P> {
    /// The player was admitted to the waiting pool.
    Success { player: P },
    /// Admission failed but the client may retry.
    Error { retry: bool },
    /// Something broke server-side; the client should not retry.
    FatalError { retry: bool },
}

/// Reply to a `join-game` request.
///
/// The happy path is silent — readiness confirmation is acknowledged
/// through lifecycle events — so the only reply shape is the failure one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JoinReply {
    FatalError { retry: bool },
}
