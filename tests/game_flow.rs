//! End-to-end rounds driven through intents, the way a front end plays.

#![allow(clippy::unwrap_used)]

use spiral_chase::Settings;
use spiral_chase::consts::UNLIMITED_KILLS;
use spiral_chase::sim::{
    Board, Card, Deck, Direction, Grid, Intent, IntentOutcome, Position, apply, run_monster,
};

fn open_board(player_count: u8) -> Board {
    let settings = Settings {
        player_count,
        seed: Some(2024),
        ..Settings::default()
    };
    Board::with_grid(&settings, Grid::empty()).unwrap()
}

fn play(board: &mut Board, intents: &[Intent]) -> Vec<IntentOutcome> {
    intents.iter().map(|&i| apply(board, i)).collect()
}

fn values(board: &Board, player: usize) -> Vec<u8> {
    board.players[player].pieces.iter().map(|p| p.value).collect()
}

#[test]
fn first_round_flips_values_only_when_monster_triggers() {
    let mut board = open_board(2);
    use Intent::*;

    // Red enters the track and stops on the first cell
    let out = play(&mut board, &[SelectPiece(1), Step(Direction::Down), Commit]);
    assert_eq!(out.last(), Some(&IntentOutcome::Committed));
    assert_eq!(board.players[0].pieces[0].pos, Position::new(0, 0));

    // Green cannot enter onto Red's piece, so stays home
    let out = play(&mut board, &[SelectPiece(1), Step(Direction::Down)]);
    assert_eq!(out[1], IntentOutcome::Rejected);
    assert_eq!(apply(&mut board, Commit), IntentOutcome::Committed);

    // Red passes its own piece
    play(&mut board, &[SelectPiece(3), Step(Direction::Down), Step(Direction::Down), Commit]);
    assert_eq!(board.players[0].pieces[1].pos, Position::new(0, 1));
    assert_eq!(values(&board, 0), vec![1, 3, 4, 5]);
    assert_eq!(board.big_turn, 0);
    assert!(!board.is_busy());

    // Green's commit closes the first round
    play(&mut board, &[SelectPiece(3), Commit]);
    assert_eq!(board.big_turn, 1);
    assert!(board.is_busy());
    assert_eq!(values(&board, 0), vec![6, 4, 3, 2]);
    assert_eq!(values(&board, 1), vec![6, 4, 3, 2]);
    assert!(apply(&mut board, SelectPiece(6)).is_rejected());

    // No long card in the first round, and nothing in sight on the
    // bottom row: the monster walks straight left without eating anyone
    run_monster(&mut board);
    let card = board.monster.last_card.unwrap();
    assert!(card.steps <= 10);
    assert_eq!(board.monster.pos.y, 9);
    assert!(board.pieces().all(|(_, p)| !p.is_dead()));

    assert_eq!(board.current_player, 1);
    assert_eq!(apply(&mut board, SelectPiece(6)), IntentOutcome::Accepted);
}

#[test]
fn kill_limit_stops_the_monster_and_early_deaths_respawn() {
    let mut board = open_board(2);
    board.big_turn = 3;
    board.players[1].pieces[0].pos = Position::new(8, 5);
    board.players[1].pieces[1].pos = Position::new(6, 5);
    board.monster.pos = Position::new(10, 5);
    board.monster.deck = Deck::from_cards(vec![Card::new(20, 1); 3]);

    board.start_monster_round();
    run_monster(&mut board);

    assert_eq!(board.monster.pos, Position::new(8, 5));
    assert!(board.players[1].pieces[0].is_home());
    assert_eq!(board.players[1].pieces[1].pos, Position::new(6, 5));
    assert_eq!(board.status().to_string().split(',').next(), Some("Monster's last card was X"));
}

#[test]
fn late_deaths_are_permanent() {
    let mut board = open_board(2);
    board.big_turn = 9;
    board.players[1].pieces[0].pos = Position::new(8, 5);
    board.monster.pos = Position::new(10, 5);
    board.monster.deck = Deck::from_cards(vec![Card::new(5, UNLIMITED_KILLS); 3]);

    board.start_monster_round();
    run_monster(&mut board);

    assert!(board.players[1].pieces[0].is_dead());
    assert_eq!(board.players[1].pieces[0].pos, Position::GRAVE);
    assert_eq!(board.monster.pos, Position::new(5, 5));
}

#[test]
fn game_ends_when_the_last_piece_finishes() {
    let mut board = open_board(1);
    for piece in &mut board.players[0].pieces {
        piece.pos = Position::GRAVE;
    }
    board.players[0].pieces[3].pos = Position::new(14, 8);
    board.monster.pos = Position::new(5, 5);

    use Intent::*;
    let out = play(
        &mut board,
        &[SelectPiece(5), Step(Direction::Down), Step(Direction::Down)],
    );
    assert!(out.iter().all(|o| *o == IntentOutcome::Accepted));
    assert!(board.players[0].pieces[3].is_finished());
    // Finished pieces cannot walk back
    assert!(apply(&mut board, Step(Direction::Up)).is_rejected());

    assert_eq!(apply(&mut board, Commit), IntentOutcome::Committed);
    assert!(board.is_game_over());
    assert!(apply(&mut board, SelectPiece(5)).is_rejected());
    assert_eq!(board.players[0].finished_count(), 1);
}
