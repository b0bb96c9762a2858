//! Spiral Chase terminal front end
//!
//! Reads one command per line from stdin, applies it to the board and
//! redraws. While the monster walks, input is not read; the board is
//! redrawn after every cell instead.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;

use spiral_chase::Settings;
use spiral_chase::sim::{
    Board, BoardView, Direction, FloorTile, Intent, IntentOutcome, PieceView, Position, apply,
    tick,
};

/// Spiral Chase - race your pieces around the spiral before the monster eats them
#[derive(Parser, Debug)]
#[command(name = "spiral-chase")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of players (1-4)
    #[arg(short, long)]
    players: Option<u8>,

    /// Random seed (default: clock)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Delay between monster steps in milliseconds
    #[arg(long)]
    step_ms: Option<u64>,
}

impl Args {
    fn settings(&self) -> Result<Settings, spiral_chase::ConfigError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(players) = self.players {
            settings.player_count = players;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(step_ms) = self.step_ms {
            settings.monster_step_ms = step_ms;
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// ASCII drawing of a board view, two characters per cell
struct TextView;

impl TextView {
    fn render(view: &BoardView) -> String {
        let mut track: HashMap<Position, &PieceView> = HashMap::new();
        let mut home = Vec::new();
        let mut finished = Vec::new();
        let mut grave = Vec::new();
        for piece in &view.pieces {
            if piece.finished {
                finished.push(piece);
            } else if piece.dead {
                grave.push(piece);
            } else if piece.pos == Position::HOME {
                home.push(piece);
            } else {
                // Selected piece drawn on top when sharing a cell
                let keep = track.get(&piece.pos).is_some_and(|p| p.selected);
                if !keep {
                    track.insert(piece.pos, piece);
                }
            }
        }
        let cells: HashMap<Position, (FloorTile, bool)> = view
            .cells
            .iter()
            .map(|c| (c.pos, (c.floor, c.stone)))
            .collect();

        let mut out = String::new();
        out.push_str(&format!("home: {}\n", Self::piece_list(&home)));
        for y in 0..view.height {
            for x in 0..view.width {
                let pos = Position::new(x, y);
                out.push_str(&Self::cell(view, pos, &track, &cells));
            }
            out.push('\n');
        }
        out.push_str(&format!("exit: {}\n", Self::piece_list(&finished)));
        out.push_str(&format!("grave: {}\n", Self::piece_list(&grave)));
        out.push_str(&format!(
            "round {}, pass {}\n{}\n",
            view.big_turn, view.small_turn, view.status
        ));
        out
    }

    fn cell(
        view: &BoardView,
        pos: Position,
        track: &HashMap<Position, &PieceView>,
        cells: &HashMap<Position, (FloorTile, bool)>,
    ) -> String {
        if pos.out_of_range() {
            return "  ".to_string();
        }
        if view.monster.pos == pos {
            let arrow = match view.monster.facing {
                Direction::Up => '^',
                Direction::Left => '<',
                Direction::Down => 'v',
                Direction::Right => '>',
            };
            return format!("M{arrow}");
        }
        if let Some(piece) = track.get(&pos) {
            return Self::piece_label(piece);
        }
        match cells.get(&pos) {
            Some((_, true)) => "##".to_string(),
            Some((FloorTile::SlipFloor, false)) => "~~".to_string(),
            Some((FloorTile::Transfer(_), false)) => "[]".to_string(),
            _ => " .".to_string(),
        }
    }

    fn piece_label(piece: &PieceView) -> String {
        let initial = piece.color.initial();
        if piece.selected {
            format!("{}{}", initial.to_ascii_lowercase(), piece.value)
        } else {
            format!("{}{}", initial, piece.value)
        }
    }

    fn piece_list(pieces: &[&PieceView]) -> String {
        if pieces.is_empty() {
            return "-".to_string();
        }
        pieces
            .iter()
            .map(|p| Self::piece_label(p))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn redraw(board: &Board) {
    print!("{}", TextView::render(&board.view()));
    let _ = io::stdout().flush();
}

/// Walk the monster to the end of its run, one cell per interval
fn pace_monster(board: &mut Board, step: Duration) {
    while tick(board) {
        redraw(board);
        thread::sleep(step);
    }
    redraw(board);
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut board = match Board::new(&settings) {
        Ok(board) => board,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Spiral Chase starting (seed {})", board.seed);

    let step = Duration::from_millis(settings.monster_step_ms);
    redraw(&board);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("stdin: {e}");
                return ExitCode::FAILURE;
            }
        };
        let command = line.trim();
        match command {
            "" => continue,
            "q" | "quit" => break,
            "json" => {
                match serde_json::to_string_pretty(&board.view()) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log::error!("cannot serialize board: {e}"),
                }
                continue;
            }
            _ => {}
        }

        let Some(intent) = Intent::parse(command) else {
            println!("unknown command: {command}");
            continue;
        };
        let outcome = apply(&mut board, intent);
        log::debug!("{intent:?} -> {outcome:?}");
        if outcome == IntentOutcome::Rejected {
            println!("not allowed");
        }
        if board.is_busy() {
            pace_monster(&mut board, step);
        } else {
            redraw(&board);
        }
        if board.is_game_over() {
            println!("Game over");
            break;
        }
    }

    ExitCode::SUCCESS
}
