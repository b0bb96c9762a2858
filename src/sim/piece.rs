//! Players and their numbered pieces

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Position;
use crate::consts::{LAST_RESPAWN_ROUND, START_VALUES};

/// Identifies a piece by owner index and slot in the owner's piece list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId {
    pub player: usize,
    pub index: usize,
}

/// A numbered piece racing along the track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPiece {
    /// Selection number, also the step budget of a move
    pub value: u8,
    pub pos: Position,
    pub already_moved: bool,
}

impl PlayerPiece {
    pub fn new(value: u8) -> Self {
        Self {
            value,
            pos: Position::HOME,
            already_moved: false,
        }
    }

    /// Send the piece off the track. Until round 7 it simply goes home;
    /// afterwards it is gone for good.
    pub fn die(&mut self, big_turn: u32) {
        self.pos = if big_turn > LAST_RESPAWN_ROUND {
            Position::GRAVE
        } else {
            Position::HOME
        };
    }

    pub fn is_dead(&self) -> bool {
        self.pos == Position::GRAVE
    }

    pub fn is_finished(&self) -> bool {
        self.pos == Position::EXIT
    }

    pub fn is_home(&self) -> bool {
        self.pos == Position::HOME
    }

    /// Still racing (may move in some future round)
    pub fn is_in_play(&self) -> bool {
        !self.is_finished() && !self.is_dead()
    }

    /// Selectable in the current round
    pub fn can_move_this_round(&self) -> bool {
        !self.already_moved && self.is_in_play()
    }

    /// Standing on a track cell
    pub fn is_on_track(&self) -> bool {
        !self.pos.out_of_range()
    }
}

/// Player colors, assigned by seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Green,
    Yellow,
    Blue,
}

impl PlayerColor {
    pub const SEATS: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Blue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::Red => "Red",
            PlayerColor::Green => "Green",
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Blue => "Blue",
        }
    }

    /// Single letter used by text views
    pub fn initial(&self) -> char {
        match self {
            PlayerColor::Red => 'R',
            PlayerColor::Green => 'G',
            PlayerColor::Yellow => 'Y',
            PlayerColor::Blue => 'B',
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: PlayerColor,
    pub pieces: Vec<PlayerPiece>,
}

impl Player {
    pub fn new(color: PlayerColor) -> Self {
        Self {
            color,
            pieces: START_VALUES.iter().map(|&v| PlayerPiece::new(v)).collect(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.color.as_str()
    }

    /// Slot of the piece carrying `value`, if any
    pub fn piece_with_value(&self, value: u8) -> Option<usize> {
        self.pieces.iter().position(|p| p.value == value)
    }

    pub fn has_piece_to_move(&self) -> bool {
        self.pieces.iter().any(PlayerPiece::can_move_this_round)
    }

    pub fn has_piece_in_play(&self) -> bool {
        self.pieces.iter().any(PlayerPiece::is_in_play)
    }

    /// Values selectable this round, ascending
    pub fn movable_values(&self) -> Vec<u8> {
        let mut values: Vec<u8> = self
            .pieces
            .iter()
            .filter(|p| p.can_move_this_round())
            .map(|p| p.value)
            .collect();
        values.sort_unstable();
        values
    }

    pub fn finished_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_finished()).count()
    }

    /// Round reset: everyone may move again and values flip 1<->6, 2<->5, 3<->4
    pub fn start_new_round(&mut self) {
        for piece in &mut self.pieces {
            piece.already_moved = false;
            piece.value = 7 - piece.value;
        }
    }
}
