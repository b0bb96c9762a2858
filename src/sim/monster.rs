//! The monster: card deck, targeting and per-cell movement
//!
//! Once per round the monster draws a card and walks that many cells along
//! the track, pushing stones and eating pieces in its way. The walk is a
//! `MonsterRun` advanced one cell at a time, so a front end can pace it.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Position};
use super::grid::FloorTile;
use super::movement::Occupant;
use super::state::Board;
use crate::consts::{LONG_CARD_STEPS, NO_TARGET, SLIDE_LIMIT, UNLIMITED_KILLS};

/// A movement instruction: walk `steps` cells, stop early after `kill_limit` kills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub steps: u32,
    pub kill_limit: u32,
}

impl Card {
    pub const fn new(steps: u32, kill_limit: u32) -> Self {
        Self { steps, kill_limit }
    }

    /// Printed face: the step count, or one X per allowed kill
    pub fn label(&self) -> String {
        if self.kill_limit == UNLIMITED_KILLS {
            self.steps.to_string()
        } else {
            "X".repeat(self.kill_limit as usize)
        }
    }

    pub fn full_set() -> Vec<Card> {
        vec![
            Card::new(5, UNLIMITED_KILLS),
            Card::new(7, UNLIMITED_KILLS),
            Card::new(7, UNLIMITED_KILLS),
            Card::new(8, UNLIMITED_KILLS),
            Card::new(8, UNLIMITED_KILLS),
            Card::new(10, UNLIMITED_KILLS),
            Card::new(LONG_CARD_STEPS, 1),
            Card::new(LONG_CARD_STEPS, 2),
        ]
    }
}

/// Cards drawn without replacement, refilled when nearly empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    pub fn new() -> Self {
        Self {
            cards: Card::full_set(),
        }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Draw uniformly at random. Long cards stay in the deck during the
    /// first round. A deck left with one card or fewer is replaced by a
    /// fresh full set.
    pub fn draw(&mut self, rng: &mut Pcg32, first_round: bool) -> Card {
        if self.cards.is_empty() {
            self.cards = Card::full_set();
        }
        let candidates: Vec<usize> = (0..self.cards.len())
            .filter(|&i| !first_round || self.cards[i].steps < LONG_CARD_STEPS)
            .collect();
        let idx = if candidates.is_empty() {
            rng.random_range(0..self.cards.len())
        } else {
            candidates[rng.random_range(0..candidates.len())]
        };

        let card = self.cards.remove(idx);
        if self.cards.len() <= 1 {
            log::info!("Monster deck reshuffled");
            self.cards = Card::full_set();
        }
        card
    }
}

/// An in-progress monster walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRun {
    pub card: Card,
    pub steps_left: u32,
    pub kills: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Position,
    pub facing: Direction,
    pub deck: Deck,
    pub last_card: Option<Card>,
    pub run: Option<MonsterRun>,
}

impl Default for Monster {
    fn default() -> Self {
        Self::new()
    }
}

impl Monster {
    pub fn new() -> Self {
        Self {
            pos: Position::LAIR,
            facing: Direction::Left,
            deck: Deck::new(),
            last_card: None,
            run: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.run.is_some()
    }
}

/// Distance to the nearest visible piece in each direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SightLines {
    pub left: u32,
    pub right: u32,
    pub up: u32,
    pub down: u32,
}

/// Pick a new facing from the four sight distances.
///
/// Evaluated in the order Left, Right, Up, Down among the minimal
/// distances. A second minimal direction among Left/Right/Up cancels the
/// turn (`None`, facing unchanged); a minimal Down only counts when
/// nothing else was picked.
pub fn resolve_facing(sight: SightLines) -> Option<Direction> {
    let min = sight.left.min(sight.right).min(sight.up).min(sight.down);
    let mut picked = None;

    if sight.left == min {
        picked = Some(Direction::Left);
    }
    if sight.right == min {
        if picked.is_some() {
            return None;
        }
        picked = Some(Direction::Right);
    }
    if sight.up == min {
        if picked.is_some() {
            return None;
        }
        picked = Some(Direction::Up);
    }
    if sight.down == min && picked.is_none() {
        picked = Some(Direction::Down);
    }
    picked
}

impl Board {
    /// Steps along a straight ray (no wraparound) to the first piece.
    /// Blocked by stones and the corridor edge; never looks backwards.
    pub fn find_player(&self, dir: Direction) -> u32 {
        if dir == self.monster.facing.opposite() {
            return NO_TARGET;
        }
        let mut pos = self.monster.pos;
        for distance in 1..NO_TARGET {
            pos = pos.offset(dir);
            if pos.out_of_range() || self.grid.has_stone(pos) {
                return NO_TARGET;
            }
            if !self.pieces_at(pos).is_empty() {
                return distance;
            }
        }
        unreachable!(
            "ray scan from {:?} toward {:?} never left the board",
            self.monster.pos, dir
        );
    }

    pub fn sight_lines(&self) -> SightLines {
        SightLines {
            left: self.find_player(Direction::Left),
            right: self.find_player(Direction::Right),
            up: self.find_player(Direction::Up),
            down: self.find_player(Direction::Down),
        }
    }

    /// Re-target: turn toward the nearest piece unless the tie-break says stay
    pub fn choose_facing(&mut self) {
        if let Some(dir) = resolve_facing(self.sight_lines()) {
            if dir != self.monster.facing {
                log::debug!("Monster turns {}", dir.as_str());
            }
            self.monster.facing = dir;
        }
    }

    /// Draw a card and begin the monster's walk. The first cell is taken
    /// immediately; the rest follow one per `tick`.
    pub fn start_monster_round(&mut self) {
        let card = self.monster.deck.draw(&mut self.rng, self.big_turn == 0);
        log::info!(
            "Round {}: monster draws {} ({} cards left)",
            self.big_turn + 1,
            card.label(),
            self.monster.deck.len()
        );
        self.monster.last_card = Some(card);
        self.choose_facing();

        if card.steps == 0 {
            return;
        }
        self.monster.run = Some(MonsterRun {
            card,
            steps_left: card.steps,
            kills: 0,
        });
        self.advance_monster();
    }

    /// Walk one cell (plus any slip-floor slides). Returns whether the run
    /// continues.
    pub(crate) fn advance_monster(&mut self) -> bool {
        let Some(mut run) = self.monster.run.take() else {
            return false;
        };

        let mut slides = SLIDE_LIMIT;
        loop {
            let facing = self.monster.facing;
            let to = self.monster.pos.step_once(facing);

            if self.grid.has_stone(to) {
                self.force_move(Occupant::Stone(to), facing);
            }
            for id in self.pieces_at(to) {
                let big_turn = self.big_turn;
                self.piece_mut(id).die(big_turn);
                run.kills += 1;
                log::info!(
                    "Monster eats {} piece {} at ({}, {})",
                    self.players[id.player].label(),
                    self.piece(id).value,
                    to.x,
                    to.y
                );
                if run.kills == run.card.kill_limit {
                    self.monster.pos = to;
                    self.choose_facing();
                    log::info!("Monster is satisfied after {} kills", run.kills);
                    return false;
                }
            }
            self.monster.pos = to;

            if self.grid.floor(to) == Some(FloorTile::SlipFloor) {
                if slides > 0 {
                    slides -= 1;
                    continue;
                }
                log::warn!("Monster slide limit reached at ({}, {})", to.x, to.y);
            }
            break;
        }

        run.steps_left = run.steps_left.saturating_sub(1);
        self.choose_facing();
        if run.steps_left == 0 {
            log::debug!("Monster rests at ({}, {})", self.monster.pos.x, self.monster.pos.y);
            return false;
        }
        self.monster.run = Some(run);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::grid::Grid;
    use rand::SeedableRng;

    fn sight(left: u32, right: u32, up: u32, down: u32) -> SightLines {
        SightLines {
            left,
            right,
            up,
            down,
        }
    }

    fn quiet_board() -> Board {
        let settings = Settings {
            player_count: 2,
            seed: Some(1),
            ..Settings::default()
        };
        let mut board = Board::with_grid(&settings, Grid::empty()).unwrap();
        board.big_turn = 1;
        board
    }

    #[test]
    fn test_resolve_facing_left_right_tie_keeps_facing() {
        assert_eq!(resolve_facing(sight(3, 3, 5, 5)), None);
    }

    #[test]
    fn test_resolve_facing_down_tie_is_ignored() {
        assert_eq!(resolve_facing(sight(5, 3, 5, 3)), Some(Direction::Right));
        assert_eq!(resolve_facing(sight(2, 9, 9, 2)), Some(Direction::Left));
    }

    #[test]
    fn test_resolve_facing_unique_minimum() {
        assert_eq!(resolve_facing(sight(3, 3, 5, 1)), Some(Direction::Down));
        assert_eq!(resolve_facing(sight(9, 9, 2, 9)), Some(Direction::Up));
        assert_eq!(resolve_facing(sight(4, 9, 9, 9)), Some(Direction::Left));
    }

    #[test]
    fn test_resolve_facing_up_tie_keeps_facing() {
        assert_eq!(resolve_facing(sight(9, 2, 2, 9)), None);
        assert_eq!(resolve_facing(sight(2, 9, 2, 9)), None);
    }

    #[test]
    fn test_resolve_facing_nothing_in_sight_keeps_facing() {
        let blind = sight(NO_TARGET, NO_TARGET, NO_TARGET, NO_TARGET);
        assert_eq!(resolve_facing(blind), None);
    }

    #[test]
    fn test_card_labels() {
        assert_eq!(Card::new(7, UNLIMITED_KILLS).label(), "7");
        assert_eq!(Card::new(20, 1).label(), "X");
        assert_eq!(Card::new(20, 2).label(), "XX");
    }

    #[test]
    fn test_first_round_never_draws_long_cards() {
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut deck = Deck::new();
            let card = deck.draw(&mut rng, true);
            assert!(card.steps < LONG_CARD_STEPS);
            assert_eq!(deck.len(), 7);
        }
    }

    #[test]
    fn test_deck_refills_when_nearly_empty() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut deck = Deck::new();
        let mut drawn = Vec::new();
        for _ in 0..7 {
            drawn.push(deck.draw(&mut rng, false));
        }
        // Seven draws from eight cards leave one, which triggers a refill
        assert_eq!(deck.len(), 8);
        let mut full = Card::full_set();
        for card in &drawn {
            let i = full.iter().position(|c| c == card).unwrap();
            full.remove(i);
        }
        assert_eq!(full.len(), 1);
    }

    #[test]
    fn test_find_player_straight_ray() {
        let mut board = quiet_board();
        board.monster.pos = Position::new(10, 5);
        board.monster.facing = Direction::Left;
        board.players[0].pieces[0].pos = Position::new(6, 5);
        board.players[1].pieces[0].pos = Position::new(10, 3);

        assert_eq!(board.find_player(Direction::Left), 4);
        assert_eq!(board.find_player(Direction::Up), 2);
        assert_eq!(board.find_player(Direction::Down), NO_TARGET);
        // Behind the monster
        assert_eq!(board.find_player(Direction::Right), NO_TARGET);
    }

    #[test]
    fn test_find_player_blocked_by_stone() {
        let mut board = quiet_board();
        board.monster.pos = Position::new(10, 5);
        board.players[0].pieces[0].pos = Position::new(6, 5);
        board.grid.place_stone(Position::new(8, 5));

        assert_eq!(board.find_player(Direction::Left), NO_TARGET);
    }

    #[test]
    fn test_choose_facing_turns_toward_nearest() {
        let mut board = quiet_board();
        board.monster.pos = Position::new(10, 5);
        board.monster.facing = Direction::Left;
        board.players[0].pieces[0].pos = Position::new(10, 7);
        board.players[1].pieces[0].pos = Position::new(5, 5);

        board.choose_facing();
        assert_eq!(board.monster.facing, Direction::Down);
    }

    #[test]
    fn test_kill_limit_stops_run_early() {
        let mut board = quiet_board();
        board.monster.pos = Position::new(7, 5);
        board.monster.facing = Direction::Left;
        board.monster.deck = Deck::from_cards(vec![Card::new(20, 1), Card::new(20, 1)]);
        board.players[0].pieces[0].pos = Position::new(5, 5);
        board.players[0].pieces[1].pos = Position::new(4, 5);

        board.start_monster_round();
        // First cell taken at once, no kill yet
        assert_eq!(board.monster.pos, Position::new(6, 5));
        assert!(board.monster.is_busy());

        assert!(!board.advance_monster());
        assert!(!board.monster.is_busy());
        assert_eq!(board.monster.pos, Position::new(5, 5));
        assert!(board.players[0].pieces[0].is_home());
        assert_eq!(board.players[0].pieces[1].pos, Position::new(4, 5));
    }

    #[test]
    fn test_run_spends_whole_budget() {
        let mut board = quiet_board();
        board.monster.pos = Position::new(10, 5);
        board.monster.facing = Direction::Left;
        board.monster.deck = Deck::from_cards(vec![Card::new(5, UNLIMITED_KILLS); 3]);

        board.start_monster_round();
        let mut ticks = 0;
        while board.advance_monster() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert_eq!(board.monster.pos, Position::new(5, 5));
        assert_eq!(board.monster.last_card, Some(Card::new(5, UNLIMITED_KILLS)));
    }

    #[test]
    fn test_slip_floor_is_free_for_the_monster() {
        let mut board = quiet_board();
        board.monster.pos = Position::new(10, 5);
        board.monster.facing = Direction::Left;
        board.monster.deck = Deck::from_cards(vec![Card::new(5, UNLIMITED_KILLS); 3]);
        board.grid.set_floor(Position::new(9, 5), FloorTile::SlipFloor);
        board.grid.set_floor(Position::new(8, 5), FloorTile::SlipFloor);

        board.start_monster_round();
        assert_eq!(board.monster.pos, Position::new(7, 5));
        while board.advance_monster() {}
        assert_eq!(board.monster.pos, Position::new(3, 5));
    }

    #[test]
    fn test_closed_slip_loop_stops_at_limit() {
        // Column 7 wraps onto itself, so the slides never reach plain floor
        let mut board = quiet_board();
        board.monster.pos = Position::new(7, 0);
        board.monster.facing = Direction::Down;
        for y in 1..10 {
            board.grid.set_floor(Position::new(7, y), FloorTile::SlipFloor);
        }
        board.monster.run = Some(MonsterRun {
            card: Card::new(1, UNLIMITED_KILLS),
            steps_left: 1,
            kills: 0,
        });

        assert!(!board.advance_monster());
        assert!(!board.is_busy());
        // First landing plus SLIDE_LIMIT more around the nine-cell loop
        let landings = 1 + SLIDE_LIMIT as i32;
        assert_eq!(board.monster.pos, Position::new(7, (landings - 1) % 9 + 1));
        assert!(!board.monster.pos.out_of_range());
    }

    #[test]
    fn test_monster_pushes_stones() {
        let mut board = quiet_board();
        board.monster.pos = Position::new(10, 5);
        board.monster.facing = Direction::Left;
        board.monster.deck = Deck::from_cards(vec![Card::new(5, UNLIMITED_KILLS); 3]);
        board.grid.place_stone(Position::new(9, 5));

        board.start_monster_round();
        assert_eq!(board.monster.pos, Position::new(9, 5));
        assert!(board.grid.has_stone(Position::new(8, 5)));
        assert_eq!(board.grid.stone_count(), 1);
    }
}
