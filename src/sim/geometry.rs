//! Track geometry
//!
//! The board is a 15x10 rectangle with two opposite corners cut away along
//! diagonals. What remains is the corridor pieces and the monster move on:
//! - `x - y >= WIDTH - 3` removes the top-right corner
//! - `y - x >= HEIGHT - 3` removes the bottom-left corner
//!
//! Running off the corridor re-enters from the cell mirrored through the
//! board center, so the track behaves like a closed loop without storing a
//! one-dimensional track index.

use serde::{Deserialize, Serialize};

use crate::consts::{HEIGHT, WIDTH};

/// One of the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// All directions, in input order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Unit vector (screen coordinates, y grows downward)
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "w" => Some(Direction::Up),
            "left" | "a" => Some(Direction::Left),
            "down" | "s" => Some(Direction::Down),
            "right" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// A cell address. Off-board values are used as markers for pieces that
/// are not on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Where pieces wait before entering the track (and respawn early in the game)
    pub const HOME: Position = Position { x: 0, y: -1 };
    /// Where permanently dead pieces go
    pub const GRAVE: Position = Position { x: 0, y: -2 };
    /// Where finished pieces go
    pub const EXIT: Position = Position {
        x: WIDTH,
        y: HEIGHT,
    };
    /// Monster start cell, the last cell of the corridor
    pub const LAIR: Position = Position {
        x: WIDTH - 1,
        y: HEIGHT - 1,
    };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True outside the corridor (including everything off the rectangle)
    #[inline]
    pub fn out_of_range(self) -> bool {
        self.x < 0
            || self.x >= WIDTH
            || self.y < 0
            || self.y >= HEIGHT
            || self.x - self.y >= WIDTH - 3
            || self.y - self.x >= HEIGHT - 3
    }

    /// Neighbor in `dir` without wraparound
    #[inline]
    pub fn offset(self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Reflection through the board center
    #[inline]
    pub fn mirrored(self) -> Position {
        Position::new(WIDTH - 1 - self.x, HEIGHT - 1 - self.y)
    }

    /// One step along the track loop
    ///
    /// Stepping off the corridor continues from the mirrored cell, so from
    /// any corridor cell the result is again a corridor cell.
    pub fn step_once(self, dir: Direction) -> Position {
        let next = self.offset(dir);
        if next.out_of_range() {
            self.mirrored().offset(dir)
        } else {
            next
        }
    }

    /// `n` steps along the track loop
    pub fn step(self, dir: Direction, n: u32) -> Position {
        (0..n).fold(self, |pos, _| pos.step_once(dir))
    }

    /// The two cells just past the corridor's last cell. A piece stepping
    /// onto either of them leaves the track as finished.
    #[inline]
    pub fn is_exit_gate(self) -> bool {
        (self.x == WIDTH && self.y == HEIGHT - 1) || (self.x == WIDTH - 1 && self.y == HEIGHT)
    }

    /// Grid indices (row, column) when inside the rectangle
    #[inline]
    pub fn cell(self) -> Option<(usize, usize)> {
        if self.x < 0 || self.x >= WIDTH || self.y < 0 || self.y >= HEIGHT {
            None
        } else {
            Some((self.y as usize, self.x as usize))
        }
    }

    /// Every corridor cell, row by row
    pub fn corridor() -> impl Iterator<Item = Position> {
        (0..HEIGHT)
            .flat_map(|y| (0..WIDTH).map(move |x| Position::new(x, y)))
            .filter(|p| !p.out_of_range())
    }
}
