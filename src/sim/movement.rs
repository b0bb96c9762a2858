//! Movement resolution for stones and pieces
//!
//! Two ways to move something one cell:
//! - `try_move`: a player's move. Checked, may fail, pushes stone chains
//!   only when every stone in the chain can move.
//! - `force_move`: the monster's shove. Never fails; anything pushed off
//!   the corridor or onto a transfer tile is destroyed.
//!
//! Both grant a bonus step when the mover lands on slip floor.

use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Position};
use super::grid::FloorTile;
use super::piece::PieceId;
use super::state::Board;
use crate::consts::SLIDE_LIMIT;

/// Anything that can be moved: a stone (identified by its cell) or a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    Stone(Position),
    Piece(PieceId),
}

impl Board {
    /// Current cell of an occupant
    pub fn occupant_pos(&self, occupant: Occupant) -> Position {
        match occupant {
            Occupant::Stone(pos) => pos,
            Occupant::Piece(id) => self.piece(id).pos,
        }
    }

    /// Speculative one-cell move. A rejected move changes nothing.
    pub fn try_move(&mut self, occupant: Occupant, dir: Direction) -> bool {
        self.try_move_sliding(occupant, dir, SLIDE_LIMIT, 0)
    }

    /// `links` counts the stones already pushed ahead of this one. A chain
    /// longer than the stone count has wrapped onto itself and has no free
    /// cell to move into.
    fn try_move_sliding(
        &mut self,
        occupant: Occupant,
        dir: Direction,
        slides: u32,
        links: usize,
    ) -> bool {
        if links > self.grid.stone_count() {
            log::debug!("Stone chain pushed {} wraps onto itself", dir.as_str());
            return false;
        }
        let from = self.occupant_pos(occupant);

        if let Occupant::Piece(id) = occupant {
            if from.offset(dir).is_exit_gate() {
                self.piece_mut(id).pos = Position::EXIT;
                log::info!(
                    "{} piece {} reached the exit",
                    self.players[id.player].label(),
                    self.piece(id).value
                );
                return true;
            }
        }

        // Off-track movers (pieces waiting at home) enter by their plain
        // neighbor; only the track itself wraps around.
        let to = if from.out_of_range() {
            from.offset(dir)
        } else {
            from.step_once(dir)
        };
        if to.out_of_range() || to == self.monster.pos {
            return false;
        }
        match self.grid.floor(to) {
            Some(FloorTile::Empty) | Some(FloorTile::SlipFloor) => {}
            Some(FloorTile::Transfer(_)) | None => return false,
        }
        if self.blocked_by_piece(occupant, to) {
            return false;
        }
        if self.grid.has_stone(to)
            && !self.try_move_sliding(Occupant::Stone(to), dir, slides, links + 1)
        {
            return false;
        }

        let moved = self.relocate(occupant, to);
        log::trace!("{:?} moved {} to ({}, {})", occupant, dir.as_str(), to.x, to.y);

        if self.grid.floor(to) == Some(FloorTile::SlipFloor) {
            self.slide(moved, dir, slides);
        }
        true
    }

    /// Pieces block stones outright; a piece is only blocked by other
    /// players' pieces.
    fn blocked_by_piece(&self, occupant: Occupant, to: Position) -> bool {
        self.pieces_at(to).iter().any(|other| match occupant {
            Occupant::Stone(_) => true,
            Occupant::Piece(me) => other.player != me.player,
        })
    }

    /// Bonus step after landing on slip floor. Its failure is ignored.
    fn slide(&mut self, occupant: Occupant, dir: Direction, slides: u32) {
        if slides == 0 {
            let pos = self.occupant_pos(occupant);
            log::warn!("Slide limit reached at ({}, {})", pos.x, pos.y);
            return;
        }
        let _ = self.try_move_sliding(occupant, dir, slides - 1, 0);
    }

    /// Unconditional push. Whatever sits in the way is pushed first.
    pub fn force_move(&mut self, occupant: Occupant, dir: Direction) {
        let from = self.occupant_pos(occupant);
        let to = from.offset(dir);

        let floor = self.grid.floor(to);
        if to.out_of_range() || floor.is_some_and(|f| f.is_transfer()) {
            self.destroy(occupant);
            return;
        }

        if self.grid.has_stone(to) {
            self.force_move(Occupant::Stone(to), dir);
        }
        for id in self.pieces_at(to) {
            self.force_move(Occupant::Piece(id), dir);
        }

        let moved = self.relocate(occupant, to);
        if floor == Some(FloorTile::SlipFloor) {
            self.slide(moved, dir, SLIDE_LIMIT);
        }
    }

    /// Move an occupant to `to` and return its new handle
    fn relocate(&mut self, occupant: Occupant, to: Position) -> Occupant {
        match occupant {
            Occupant::Stone(from) => {
                self.grid.move_stone(from, to);
                Occupant::Stone(to)
            }
            Occupant::Piece(id) => {
                self.piece_mut(id).pos = to;
                occupant
            }
        }
    }

    fn destroy(&mut self, occupant: Occupant) {
        match occupant {
            Occupant::Stone(pos) => {
                self.grid.remove_stone(pos);
                log::debug!("Stone at ({}, {}) destroyed", pos.x, pos.y);
            }
            Occupant::Piece(id) => {
                let big_turn = self.big_turn;
                self.piece_mut(id).die(big_turn);
                log::info!(
                    "{} piece {} was pushed off the track",
                    self.players[id.player].label(),
                    self.piece(id).value
                );
            }
        }
    }
}
