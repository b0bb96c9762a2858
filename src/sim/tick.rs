//! Input dispatch and monster pacing
//!
//! Front ends translate raw input into `Intent`s and call `apply`. While
//! the monster walks they call `tick` once per pacing interval until it
//! returns `false`; intents arriving in between are dropped.

use serde::{Deserialize, Serialize};

use super::geometry::Direction;
use super::state::Board;
use super::turn::IntentOutcome;

/// A player command, already decoded from keys or text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    SelectPiece(u8),
    Step(Direction),
    Commit,
    Cancel,
}

impl Intent {
    /// Parse a text command: `1`-`6`, a direction word or WASD letter,
    /// `enter`/`c` to commit, `esc`/`x` to cancel
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if let Ok(value) = s.parse::<u8>() {
            return (1..=6).contains(&value).then_some(Intent::SelectPiece(value));
        }
        match s.as_str() {
            "enter" | "c" | "commit" => Some(Intent::Commit),
            "esc" | "x" | "cancel" => Some(Intent::Cancel),
            other => Direction::from_str(other).map(Intent::Step),
        }
    }
}

/// Apply one intent to the board
pub fn apply(board: &mut Board, intent: Intent) -> IntentOutcome {
    match intent {
        Intent::SelectPiece(value) => board.select_piece(value),
        Intent::Step(dir) => board.step_direction(dir),
        Intent::Commit => board.commit(),
        Intent::Cancel => board.cancel(),
    }
}

/// Advance the monster by one cell. Returns whether it is still walking.
///
/// When the walk ends the turn is settled, which may start the next
/// player's turn or end the game.
pub fn tick(board: &mut Board) -> bool {
    if !board.is_busy() {
        return false;
    }
    if board.advance_monster() {
        return true;
    }
    board.settle_turn();
    board.is_busy()
}

/// Tick until the monster stands still. Returns the number of ticks taken.
pub fn run_monster(board: &mut Board) -> usize {
    let mut ticks = 0;
    while tick(board) {
        ticks += 1;
    }
    ticks
}
