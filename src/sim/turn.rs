//! Turn controller
//!
//! A player picks one of their pieces by value, walks it up to `value`
//! cells, then either commits or cancels. Nothing is final until commit:
//! the grid and the piece are snapshotted at selection and restored on
//! cancel. After every commit the turn passes on; once enough passes are
//! done the monster takes its round and piece values flip.

use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Position};
use super::grid::FloorTile;
use super::movement::Occupant;
use super::piece::PieceId;
use super::state::{Board, MoveSnapshot, TurnPhase};
use crate::consts::PIECES_PER_PLAYER;

/// Result of a player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentOutcome {
    Accepted,
    /// The move was final; the turn passed on
    Committed,
    Rejected,
}

impl IntentOutcome {
    pub fn is_rejected(&self) -> bool {
        *self == IntentOutcome::Rejected
    }
}

impl Board {
    /// Pick the current player's piece carrying `value`
    pub fn select_piece(&mut self, value: u8) -> IntentOutcome {
        if self.input_blocked("select") || self.phase != TurnPhase::SelectingPiece {
            return IntentOutcome::Rejected;
        }
        let player = self.current_player;
        let Some(index) = self.players[player].piece_with_value(value) else {
            return IntentOutcome::Rejected;
        };
        let id = PieceId { player, index };
        if !self.piece(id).can_move_this_round() {
            return IntentOutcome::Rejected;
        }

        let snapshot = MoveSnapshot {
            stones: self.grid.stone_layer().clone(),
            piece_pos: self.piece(id).pos,
        };
        self.phase = TurnPhase::MovingPiece {
            piece: id,
            steps_taken: 0,
            snapshot,
        };
        log::debug!("{} selects piece {}", self.players[player].label(), value);
        IntentOutcome::Accepted
    }

    /// Walk the selected piece one cell. Each accepted step costs one unit
    /// of the piece's value, however far slip floor carried it.
    pub fn step_direction(&mut self, dir: Direction) -> IntentOutcome {
        if self.input_blocked("step") {
            return IntentOutcome::Rejected;
        }
        let TurnPhase::MovingPiece {
            piece, steps_taken, ..
        } = self.phase
        else {
            return IntentOutcome::Rejected;
        };
        let selected = self.piece(piece);
        if steps_taken >= selected.value || selected.is_finished() {
            return IntentOutcome::Rejected;
        }
        if !self.try_move(Occupant::Piece(piece), dir) {
            return IntentOutcome::Rejected;
        }

        if let TurnPhase::MovingPiece { steps_taken, .. } = &mut self.phase {
            *steps_taken += 1;
        }
        IntentOutcome::Accepted
    }

    /// Undo every step of the current selection
    pub fn cancel(&mut self) -> IntentOutcome {
        if self.input_blocked("cancel") {
            return IntentOutcome::Rejected;
        }
        if !matches!(self.phase, TurnPhase::MovingPiece { .. }) {
            return IntentOutcome::Accepted;
        }
        let TurnPhase::MovingPiece {
            piece, snapshot, ..
        } = std::mem::replace(&mut self.phase, TurnPhase::SelectingPiece)
        else {
            return IntentOutcome::Accepted;
        };

        self.grid.restore_stones(snapshot.stones);
        self.piece_mut(piece).pos = snapshot.piece_pos;
        log::debug!("{} cancels their move", self.players[piece.player].label());
        IntentOutcome::Accepted
    }

    /// Finish the move if the piece may stay where it is
    pub fn commit(&mut self) -> IntentOutcome {
        if self.input_blocked("commit") {
            return IntentOutcome::Rejected;
        }
        let Some(piece) = self.selected_piece() else {
            return IntentOutcome::Rejected;
        };
        if !self.can_rest(piece) {
            return IntentOutcome::Rejected;
        }

        self.piece_mut(piece).already_moved = true;
        self.phase = TurnPhase::SelectingPiece;
        let p = self.piece(piece);
        log::debug!(
            "{} commits piece {} at ({}, {})",
            self.players[piece.player].label(),
            p.value,
            p.pos.x,
            p.pos.y
        );
        self.advance_turn();
        IntentOutcome::Committed
    }

    /// Home and the exit hold any number of pieces; a track cell must be
    /// plain floor and not shared.
    pub fn can_rest(&self, piece: PieceId) -> bool {
        let pos = self.piece(piece).pos;
        if pos == Position::HOME || pos == Position::EXIT {
            return true;
        }
        if self.grid.floor(pos) != Some(FloorTile::Empty) {
            return false;
        }
        self.pieces_at(pos).iter().all(|&other| other == piece)
    }

    fn input_blocked(&self, intent: &str) -> bool {
        if self.is_busy() {
            log::warn!("Ignoring {} while the monster moves", intent);
            return true;
        }
        self.is_game_over()
    }

    fn any_piece_in_play(&self) -> bool {
        self.players.iter().any(|p| p.has_piece_in_play())
    }

    fn round_complete(&self) -> bool {
        (self.big_turn == 0 && self.small_turn >= 2)
            || self.small_turn as usize >= PIECES_PER_PLAYER
    }

    /// Pass the turn to the next player with something to move, ending
    /// rounds along the way. Stops with `GameOver` when no piece is left
    /// in play.
    pub(crate) fn advance_turn(&mut self) {
        let n = self.players.len();
        loop {
            if !self.any_piece_in_play() {
                self.phase = TurnPhase::GameOver;
                log::info!("Game over after {} rounds", self.big_turn);
                for player in &self.players {
                    log::info!("{}: {} pieces finished", player.label(), player.finished_count());
                }
                return;
            }

            self.current_player = (self.current_player + 1) % n;
            if self.current_player == self.first_player {
                self.small_turn += 1;
                if self.round_complete() {
                    self.end_round();
                }
            }
            if self.current().has_piece_to_move() {
                return;
            }
        }
    }

    /// Monster takes its round, pieces flip, the next player leads
    fn end_round(&mut self) {
        self.start_monster_round();
        for player in &mut self.players {
            player.start_new_round();
        }
        self.big_turn += 1;
        self.first_player = (self.first_player + 1) % self.players.len();
        self.current_player = self.first_player;
        self.small_turn = 0;
    }

    /// Called once a monster run is over: pass the turn on if the monster
    /// took the current player's last movable piece.
    pub(crate) fn settle_turn(&mut self) {
        if self.phase != TurnPhase::SelectingPiece {
            return;
        }
        if !self.any_piece_in_play() || !self.current().has_piece_to_move() {
            self.advance_turn();
        }
    }
}
