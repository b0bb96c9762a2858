//! Deterministic rules module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only (board layout and card draws)
//! - Stable iteration order (seat order, then slot order)
//! - No rendering, timing or terminal dependencies

pub mod geometry;
pub mod grid;
pub mod monster;
pub mod movement;
pub mod piece;
pub mod state;
pub mod tick;
pub mod turn;

pub use geometry::{Direction, Position};
pub use grid::{FloorTile, Grid, SlipRegion, Stone, StoneLayer};
pub use monster::{Card, Deck, Monster, MonsterRun, SightLines, resolve_facing};
pub use movement::Occupant;
pub use piece::{PieceId, Player, PlayerColor, PlayerPiece};
pub use state::{
    Board, BoardView, CellView, MonsterView, MoveSnapshot, PieceView, StatusLine, TurnPhase,
};
pub use tick::{Intent, apply, run_monster, tick};
pub use turn::IntentOutcome;
