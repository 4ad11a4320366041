//! The player profile model and the points-to-rank ladder.

use chrono::{DateTime, Utc};
use gridfall_protocol::{PlayerId, PublicId, SocketId};
use serde::{Deserialize, Serialize};

/// Starting health for every player entering a session.
pub const STARTING_HEALTH: u32 = 100;

/// The server-side view of a player: durable bookkeeping plus the
/// session-scoped gameplay fields and the current connection handle.
///
/// This is what the lobby pool holds. Before a profile is embedded in a
/// game snapshot it must be projected through [`PlayerProfile::public_view`],
/// which strips the private id and the connection handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub public_id: PublicId,
    pub socket_id: SocketId,
    pub username: String,
    pub ready: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rank: String,
    pub points: i32,
    pub total_games: u32,
    pub health: u32,
    pub passive_abilities: Vec<String>,
    pub current_ability: String,
}

impl PlayerProfile {
    /// Creates a brand-new profile for a first-time player.
    pub fn new(socket_id: SocketId, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlayerId::new(),
            public_id: PublicId::new(),
            socket_id,
            username: username.into(),
            ready: false,
            created_at: now,
            updated_at: now,
            rank: rank_for_points(0).to_owned(),
            points: 0,
            total_games: 0,
            health: STARTING_HEALTH,
            passive_abilities: Vec::new(),
            current_ability: String::new(),
        }
    }

    /// Projects the session-scoped view: everything a peer may see.
    /// The private id and the connection handle are stripped here and
    /// nowhere else.
    pub fn public_view(&self) -> GamePlayer {
        GamePlayer {
            public_id: self.public_id,
            username: self.username.clone(),
            ready: self.ready,
            created_at: self.created_at,
            rank: self.rank.clone(),
            points: self.points,
            total_games: self.total_games,
            health: self.health,
            passive_abilities: self.passive_abilities.clone(),
            current_ability: self.current_ability.clone(),
        }
    }

    /// Round-completion hook: applies the point delta for a finishing
    /// position (1 = winner .. 4 = last) and refreshes the rank.
    pub fn apply_match_result(&mut self, position: u8) {
        match position {
            1 => self.points += 2,
            2 => self.points += 1,
            3 => {}
            4 => {
                if self.points > 5 && self.points < 11 {
                    self.points -= 1;
                } else if self.points < 31 {
                    self.points -= 2;
                } else {
                    self.points -= 3;
                }
            }
            _ => {}
        }

        self.rank = rank_for_points(self.points).to_owned();
    }
}

/// The session-scoped projection of a player, embedded in game snapshots
/// and delivered to every peer in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePlayer {
    pub public_id: PublicId,
    pub username: String,
    pub ready: bool,
    pub created_at: DateTime<Utc>,
    pub rank: String,
    pub points: i32,
    pub total_games: u32,
    pub health: u32,
    pub passive_abilities: Vec<String>,
    pub current_ability: String,
}

/// The rank ladder: one title per five-point band.
pub fn rank_for_points(points: i32) -> &'static str {
    if points < 5 {
        "Rookie"
    } else if points < 10 {
        "Initiate"
    } else if points < 15 {
        "Private"
    } else if points < 20 {
        "Corporal"
    } else if points < 25 {
        "Lieutenant"
    } else if points < 30 {
        "Sergeant"
    } else if points < 35 {
        "Captain"
    } else if points < 40 {
        "General"
    } else {
        "President"
    }
}
