//! Spiral Chase - a race-and-chase board game engine
//!
//! Core modules:
//! - `sim`: Board rules (geometry, grid, movement, pieces, turns, monster)
//! - `settings`: Startup configuration
//! - `error`: Configuration errors
//!
//! Rendering and keyboard handling are not part of the library; the
//! `spiral-chase` binary ships a small terminal adapter on top of it.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Board dimensions (cells)
    pub const WIDTH: i32 = 15;
    pub const HEIGHT: i32 = 10;

    /// Stones placed at board construction
    pub const STONE_COUNT: usize = 11;

    /// Values of each player's pieces at game start
    pub const START_VALUES: [u8; 4] = [1, 3, 4, 5];
    /// Pieces per player
    pub const PIECES_PER_PLAYER: usize = START_VALUES.len();

    /// Supported player counts
    pub const MIN_PLAYERS: u8 = 1;
    pub const MAX_PLAYERS: u8 = 4;

    /// Last round in which a dead piece goes back home instead of the grave
    pub const LAST_RESPAWN_ROUND: u32 = 7;

    /// Sight distance reported when the monster sees no piece
    pub const NO_TARGET: u32 = 99;
    /// Kill limit meaning "never stop early"
    pub const UNLIMITED_KILLS: u32 = 99;
    /// Cards at least this long are held back during the first round
    pub const LONG_CARD_STEPS: u32 = 20;

    /// Maximum chained slip-floor slides in one move
    pub const SLIDE_LIMIT: u32 = (WIDTH * HEIGHT) as u32;

    /// Default real-time delay between monster cells (milliseconds)
    pub const MONSTER_STEP_MS: u64 = 500;
}
