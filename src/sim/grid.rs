//! Cell grid: floor tiles and stones
//!
//! Floor tiles are laid out once when the board is built. Stones move
//! around when pushed; each one remembers its own cell.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Position};
use crate::consts::{HEIGHT, STONE_COUNT, WIDTH};

const COLS: usize = WIDTH as usize;
const ROWS: usize = HEIGHT as usize;

/// Floor kind of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloorTile {
    #[default]
    Empty,
    /// Entering it grants a free extra step in the same direction
    SlipFloor,
    /// Blocks speculative moves; destroys anything forced onto it
    Transfer(Direction),
}

impl FloorTile {
    pub fn is_transfer(&self) -> bool {
        matches!(self, FloorTile::Transfer(_))
    }
}

/// An obstacle that stays put until pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stone {
    pub pos: Position,
}

/// Stone occupancy of every cell
///
/// Copied wholesale into a move snapshot and restored on cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoneLayer {
    cells: [[Option<Stone>; COLS]; ROWS],
}

impl Default for StoneLayer {
    fn default() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
        }
    }
}

/// Shape of a slip-floor region, as offsets from its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlipRegion {
    Square,
    Row,
    Column,
}

impl SlipRegion {
    pub fn cells(self) -> [(i32, i32); 4] {
        match self {
            SlipRegion::Square => [(0, 0), (1, 0), (0, 1), (1, 1)],
            SlipRegion::Row => [(0, 0), (1, 0), (2, 0), (3, 0)],
            SlipRegion::Column => [(0, 0), (0, 1), (0, 2), (0, 3)],
        }
    }
}

/// The board's cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    floor: [[FloorTile; COLS]; ROWS],
    stones: StoneLayer,
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// A grid with Empty floor everywhere and no stones
    pub fn empty() -> Self {
        Self {
            floor: [[FloorTile::Empty; COLS]; ROWS],
            stones: StoneLayer::default(),
        }
    }

    /// Random layout: stones first, then a 2x2 slip block and a 4-long
    /// slip strip. Every placement is retried until it fits.
    pub fn generate(rng: &mut Pcg32) -> Self {
        let mut grid = Self::empty();

        for _ in 0..STONE_COUNT {
            loop {
                let pos = random_cell(rng);
                if grid.can_hold_stone(pos) {
                    grid.place_stone(pos);
                    break;
                }
            }
        }

        grid.place_slip_region(rng, SlipRegion::Square);
        let strip = if rng.random_range(0..2) == 0 {
            SlipRegion::Row
        } else {
            SlipRegion::Column
        };
        grid.place_slip_region(rng, strip);

        log::debug!(
            "Generated grid: {} stones, {} slip cells",
            grid.stone_count(),
            grid.count_floor(FloorTile::SlipFloor)
        );
        grid
    }

    fn place_slip_region(&mut self, rng: &mut Pcg32, region: SlipRegion) {
        loop {
            let origin = random_cell(rng);
            let cells = region
                .cells()
                .map(|(dx, dy)| Position::new(origin.x + dx, origin.y + dy));
            if cells.iter().all(|&p| self.can_hold_slip_floor(p)) {
                for p in cells {
                    self.set_floor(p, FloorTile::SlipFloor);
                }
                return;
            }
        }
    }

    fn can_hold_stone(&self, pos: Position) -> bool {
        !pos.out_of_range() && !in_reserved_zone(pos) && !self.has_stone(pos)
    }

    fn can_hold_slip_floor(&self, pos: Position) -> bool {
        self.can_hold_stone(pos) && self.floor(pos) == Some(FloorTile::Empty)
    }

    /// Floor kind, or `None` outside the rectangle
    pub fn floor(&self, pos: Position) -> Option<FloorTile> {
        pos.cell().map(|(row, col)| self.floor[row][col])
    }

    /// Lay a floor tile. Used while building a board.
    pub fn set_floor(&mut self, pos: Position, tile: FloorTile) {
        if let Some((row, col)) = pos.cell() {
            self.floor[row][col] = tile;
        }
    }

    pub fn stone_at(&self, pos: Position) -> Option<Stone> {
        pos.cell().and_then(|(row, col)| self.stones.cells[row][col])
    }

    pub fn has_stone(&self, pos: Position) -> bool {
        self.stone_at(pos).is_some()
    }

    pub fn place_stone(&mut self, pos: Position) {
        if let Some((row, col)) = pos.cell() {
            self.stones.cells[row][col] = Some(Stone { pos });
        }
    }

    pub fn remove_stone(&mut self, pos: Position) -> Option<Stone> {
        pos.cell()
            .and_then(|(row, col)| self.stones.cells[row][col].take())
    }

    /// Relocate the stone at `from` to `to`, keeping its position in sync
    pub fn move_stone(&mut self, from: Position, to: Position) {
        if self.remove_stone(from).is_some() {
            self.place_stone(to);
        }
    }

    pub fn stones(&self) -> impl Iterator<Item = Stone> + '_ {
        self.stones.cells.iter().flatten().filter_map(|cell| *cell)
    }

    pub fn stone_count(&self) -> usize {
        self.stones().count()
    }

    pub fn count_floor(&self, tile: FloorTile) -> usize {
        self.floor.iter().flatten().filter(|&&t| t == tile).count()
    }

    pub fn stone_layer(&self) -> &StoneLayer {
        &self.stones
    }

    pub fn restore_stones(&mut self, layer: StoneLayer) {
        self.stones = layer;
    }
}

fn random_cell(rng: &mut Pcg32) -> Position {
    Position::new(rng.random_range(0..WIDTH), rng.random_range(0..HEIGHT))
}

/// Start zone (top-left 3x3) and the monster's lair stay clear
fn in_reserved_zone(pos: Position) -> bool {
    (pos.x < 3 && pos.y < 3) || pos == Position::LAIR
}
