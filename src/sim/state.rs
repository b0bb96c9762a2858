//! Board state and its read-only views
//!
//! The board is the single source of truth; every rule mutates it in
//! place. Renderers read it through `status()` and `view()`.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Position};
use super::grid::{FloorTile, Grid, StoneLayer};
use super::monster::{Card, Monster};
use super::piece::{PieceId, Player, PlayerColor, PlayerPiece};
use crate::consts::{HEIGHT, WIDTH};
use crate::error::ConfigError;
use crate::settings::Settings;

/// What the selected piece looked like before its first step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSnapshot {
    pub stones: StoneLayer,
    pub piece_pos: Position,
}

/// Turn controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for the current player to pick a piece by value
    SelectingPiece,
    /// A piece is being moved; nothing is final until commit
    MovingPiece {
        piece: PieceId,
        steps_taken: u8,
        snapshot: MoveSnapshot,
    },
    /// No piece can ever move again
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Board {
    /// Seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub grid: Grid,
    pub players: Vec<Player>,
    pub monster: Monster,
    /// Passes over all players in the current round
    pub small_turn: u32,
    /// Completed rounds
    pub big_turn: u32,
    pub current_player: usize,
    pub first_player: usize,
    pub phase: TurnPhase,
}

impl Board {
    /// Build a board with a random layout
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(clock_seed);
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::generate(&mut rng);
        log::info!(
            "New board: {} players, seed {}",
            settings.player_count,
            seed
        );
        Ok(Self::assemble(settings.player_count, seed, rng, grid))
    }

    /// Build a board around a prepared grid (scenarios, tests)
    pub fn with_grid(settings: &Settings, grid: Grid) -> Result<Self, ConfigError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(clock_seed);
        Ok(Self::assemble(
            settings.player_count,
            seed,
            Pcg32::seed_from_u64(seed),
            grid,
        ))
    }

    fn assemble(player_count: u8, seed: u64, rng: Pcg32, grid: Grid) -> Self {
        let players = PlayerColor::SEATS
            .iter()
            .take(player_count as usize)
            .map(|&color| Player::new(color))
            .collect();
        Self {
            seed,
            rng,
            grid,
            players,
            monster: Monster::new(),
            small_turn: 0,
            big_turn: 0,
            current_player: 0,
            first_player: 0,
            phase: TurnPhase::SelectingPiece,
        }
    }

    pub fn piece(&self, id: PieceId) -> &PlayerPiece {
        &self.players[id.player].pieces[id.index]
    }

    pub fn piece_mut(&mut self, id: PieceId) -> &mut PlayerPiece {
        &mut self.players[id.player].pieces[id.index]
    }

    /// Every piece with its id, seat order then slot order
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &PlayerPiece)> + '_ {
        self.players.iter().enumerate().flat_map(|(player, p)| {
            p.pieces
                .iter()
                .enumerate()
                .map(move |(index, piece)| (PieceId { player, index }, piece))
        })
    }

    /// Pieces standing on a track cell
    pub fn pieces_at(&self, pos: Position) -> Vec<PieceId> {
        if pos.out_of_range() {
            return Vec::new();
        }
        self.pieces()
            .filter(|(_, piece)| piece.pos == pos)
            .map(|(id, _)| id)
            .collect()
    }

    /// True while the monster walks; player input is ignored meanwhile
    pub fn is_busy(&self) -> bool {
        self.monster.is_busy()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn selected_piece(&self) -> Option<PieceId> {
        match self.phase {
            TurnPhase::MovingPiece { piece, .. } => Some(piece),
            _ => None,
        }
    }

    /// One-line summary for a window title or prompt
    pub fn status(&self) -> StatusLine {
        StatusLine {
            player: self.current().color,
            deck_remaining: self.monster.deck.len(),
            last_card: self.monster.last_card,
            movable: self.current().movable_values(),
            game_over: self.is_game_over(),
        }
    }

    /// Everything a renderer needs, in one serializable value
    pub fn view(&self) -> BoardView {
        let mut cells = Vec::new();
        for pos in Position::corridor() {
            let floor = self.grid.floor(pos).unwrap_or_default();
            let stone = self.grid.has_stone(pos);
            if floor != FloorTile::Empty || stone {
                cells.push(CellView { pos, floor, stone });
            }
        }

        let pieces = self
            .pieces()
            .map(|(id, piece)| PieceView {
                id,
                color: self.players[id.player].color,
                value: piece.value,
                pos: piece.pos,
                already_moved: piece.already_moved,
                finished: piece.is_finished(),
                dead: piece.is_dead(),
                selected: self.selected_piece() == Some(id),
            })
            .collect();

        BoardView {
            width: WIDTH,
            height: HEIGHT,
            cells,
            pieces,
            monster: MonsterView {
                pos: self.monster.pos,
                facing: self.monster.facing,
                busy: self.monster.is_busy(),
            },
            deck_remaining: self.monster.deck.len(),
            last_card: self.monster.last_card,
            small_turn: self.small_turn,
            big_turn: self.big_turn,
            current_player: self.current().color,
            game_over: self.is_game_over(),
            status: self.status().to_string(),
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Computed status: whose turn, deck size, last card, movable values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub player: PlayerColor,
    pub deck_remaining: usize,
    pub last_card: Option<Card>,
    pub movable: Vec<u8>,
    pub game_over: bool,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(card) = &self.last_card {
            write!(f, "Monster's last card was {}, ", card.label())?;
        }
        write!(f, "{} cards left, ", self.deck_remaining)?;
        if self.game_over {
            return write!(f, "game over");
        }
        write!(f, "{} to move", self.player)?;
        if !self.movable.is_empty() {
            let values: Vec<String> = self.movable.iter().map(u8::to_string).collect();
            write!(f, ", movable pieces: {}", values.join(", "))?;
        }
        Ok(())
    }
}

/// A non-empty cell (special floor or stone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub pos: Position,
    pub floor: FloorTile,
    pub stone: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    pub id: PieceId,
    pub color: PlayerColor,
    pub value: u8,
    pub pos: Position,
    pub already_moved: bool,
    pub finished: bool,
    pub dead: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterView {
    pub pos: Position,
    pub facing: Direction,
    pub busy: bool,
}

/// Snapshot of the board for renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<CellView>,
    pub pieces: Vec<PieceView>,
    pub monster: MonsterView,
    pub deck_remaining: usize,
    pub last_card: Option<Card>,
    pub small_turn: u32,
    pub big_turn: u32,
    pub current_player: PlayerColor,
    pub game_over: bool,
    pub status: String,
}
