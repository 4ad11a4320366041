//! One match instance and its lifecycle transitions.
//!
//! ```text
//! Created ──(start)──> Active ──(advance_round)*──> Ended (external)
//! ```
//!
//! A `Game` is created with exactly the players the matchmaker hands it
//! (the count is enforced there, not here), mutated by start,
//! round-advance, and cell-clear operations, and either destroyed when
//! the readiness handshake fails or kept indefinitely once started.

use chrono::{DateTime, Utc};
use gridfall_player::{GamePlayer, PlayerProfile};
use gridfall_protocol::{GameId, PublicId};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::GameMap;

/// The immutable-shaped view of a game: the exact record persisted to
/// the shared cache and embedded in lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub started: bool,
    pub start_time: DateTime<Utc>,
    /// Monotonic round counter, starts at 0.
    pub round: u32,
    /// Player order is randomized once at creation and fixed thereafter.
    pub players: Vec<GamePlayer>,
    /// Cyclic index over player slots.
    pub turn: u8,
    pub map: GameMap,
}

/// A live game wrapping its snapshot state.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    state: GameSnapshot,
}

impl Game {
    /// Creates a new game from the matchmaker's batch.
    ///
    /// Private ids and connection handles are stripped here: only each
    /// player's public projection is embedded. The player order is
    /// shuffled once and never changes afterwards.
    pub fn new(profiles: &[PlayerProfile], rng: &mut impl Rng) -> Self {
        let mut players: Vec<GamePlayer> =
            profiles.iter().map(PlayerProfile::public_view).collect();
        players.shuffle(rng);

        let state = GameSnapshot {
            id: GameId::new(),
            started: false,
            start_time: Utc::now(),
            round: 0,
            players,
            turn: 0,
            map: GameMap::generate(rng),
        };
        info!(game_id = %state.id, players = state.players.len(), "game created");

        Self { state }
    }

    /// Rehydrates a game from its persisted snapshot.
    pub fn from_snapshot(state: GameSnapshot) -> Self {
        Self { state }
    }

    pub fn id(&self) -> GameId {
        self.state.id
    }

    pub fn started(&self) -> bool {
        self.state.started
    }

    /// Borrows the current snapshot.
    pub fn snapshot(&self) -> &GameSnapshot {
        &self.state
    }

    /// Consumes the game, yielding its snapshot for persistence.
    pub fn into_snapshot(self) -> GameSnapshot {
        self.state
    }

    /// Transition to Active: sets the started flag and stamps the start
    /// time. The start event is emitted by the layer that persists.
    pub fn start(&mut self) {
        self.state.started = true;
        self.state.start_time = Utc::now();
        info!(game_id = %self.state.id, "game started");
    }

    /// One round transition: shift the grid forward, bump the round
    /// counter, cycle the turn pointer.
    pub fn advance_round(&mut self, rng: &mut impl Rng) {
        self.state.map.advance_row(rng);
        self.state.round += 1;

        // Observed behavior: the pointer cycles 0..=4, one slot more
        // than a four-player batch.
        if self.state.turn < 4 {
            self.state.turn += 1;
        } else {
            self.state.turn = 0;
        }
    }

    /// Clears one grid cell to the blank marker.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        self.state.map.clear_cell(row, col);
    }

    /// Marks the player with the given public id ready. Returns whether
    /// such a player exists in this game.
    pub fn mark_ready(&mut self, public_id: PublicId) -> bool {
        for player in &mut self.state.players {
            if player.public_id == public_id {
                player.ready = true;
                return true;
            }
        }
        false
    }

    /// True when every player has confirmed readiness.
    pub fn all_ready(&self) -> bool {
        self.state.players.iter().all(|p| p.ready)
    }

    /// Membership test by public id. False for an empty player list.
    pub fn contains(&self, public_id: PublicId) -> bool {
        self.state.players.iter().any(|p| p.public_id == public_id)
    }
}
