//! The Gridfall session core: ability draws, the procedural grid, and
//! the game state machine.
//!
//! # Key types
//!
//! - [`abilities`] — the weighted catalog and the two-stage random draw
//! - [`GameMap`] — the 6x15 grid with density-validated row generation
//! - [`Game`] — one match instance: players, round counter, turn
//!   pointer, grid, and its lifecycle transitions
//! - [`GameSnapshot`] — the immutable-shaped view persisted to the
//!   shared cache and carried by lifecycle events
//! - [`GameRepository`] — snapshot persistence over a [`KvStore`]
//!
//! [`KvStore`]: gridfall_store::KvStore

pub mod abilities;
mod error;
mod game;
mod map;
mod repository;

pub use error::GameError;
pub use game::{Game, GameSnapshot};
pub use map::{
    GameMap, GRID_COLS, GRID_ROWS, MIN_ABILITIES_PER_ROW,
    MIN_BLANKS_PER_ROW, POPULATED_ROWS, ROW_REGEN_ATTEMPTS,
};
pub use repository::GameRepository;
