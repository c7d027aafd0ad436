//! Human vs agent in the terminal.
//!
//! Each side has a hidden fleet. Enter `row col` to fire at the agent's
//! board; the agent then fires at yours. First to sink the other fleet wins.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use battleship_rl::core::{BattleshipError, BoardConfig, GameRng, Move};
use battleship_rl::game::Game;
use battleship_rl::nn::{load_or_default, EpsilonSchedule, SoftmaxPolicy};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Play Battleship against a trained policy")]
struct Args {
    /// Trained policy file
    #[arg(long)]
    model: Option<PathBuf>,

    /// JSON board config
    #[arg(long)]
    board: Option<PathBuf>,

    /// Seed for both fleets
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Let the agent keep its saved exploration rate instead of playing greedily
    #[arg(long)]
    explore: bool,
}

enum Input {
    Move(Move),
    Quit,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.board {
        Some(path) => BoardConfig::from_json_file(path)
            .with_context(|| format!("loading board {}", path.display()))?,
        None => BoardConfig::default(),
    };

    let mut policy = SoftmaxPolicy::for_board(&config);
    if let Some(path) = &args.model {
        load_or_default(&mut policy, path);
    }
    if !args.explore {
        policy = policy.with_schedule(EpsilonSchedule::default().with_epsilon(0.0).with_min(0.0));
    }

    // The human shoots at `agent_fleet`; the agent shoots at `human_fleet`.
    let mut rng = GameRng::new(args.seed);
    let mut agent_fleet = Game::with_rng(config.clone(), rng.fork())?;
    let mut human_fleet = Game::with_rng(config.clone(), rng.fork())?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_boards(&agent_fleet, &human_fleet);

        let mv = loop {
            print!("Fire at (row col, or q to quit): ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            match parse_input(&line?, &config) {
                Ok(Input::Quit) => return Ok(()),
                Ok(Input::Move(mv)) => break mv,
                Err(msg) => println!("{msg}"),
            }
        };

        match agent_fleet.take_move(&policy, Some(mv)) {
            Ok(Some(turn)) => {
                let (row, col) = turn.mv.coords(config.width);
                println!("You fire at ({row}, {col}): {}", outcome(turn.hit, turn.sunk));
            }
            Ok(None) => {}
            Err(BattleshipError::InvalidMove { reason, .. }) => {
                println!("Can't fire there: {reason}");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
        if agent_fleet.board().is_finished() {
            print_boards(&agent_fleet, &human_fleet);
            println!("You sank the whole fleet. You win!");
            return Ok(());
        }

        if let Some(turn) = human_fleet.take_move(&policy, None)? {
            let (row, col) = turn.mv.coords(config.width);
            println!("Agent fires at ({row}, {col}): {}", outcome(turn.hit, turn.sunk));
        }
        if human_fleet.board().is_finished() {
            print_boards(&agent_fleet, &human_fleet);
            println!("The agent sank your fleet. You lose.");
            return Ok(());
        }
    }
}

fn parse_input(line: &str, config: &BoardConfig) -> Result<Input, String> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(Input::Quit);
    }
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [row, col] = parts.as_slice() else {
        return Err("Enter two numbers: row col".into());
    };
    let row: usize = row.parse().map_err(|_| format!("Bad row: {row}"))?;
    let col: usize = col.parse().map_err(|_| format!("Bad column: {col}"))?;
    if row >= config.height || col >= config.width {
        return Err(format!(
            "({row}, {col}) is off the {}x{} board",
            config.height, config.width
        ));
    }
    Ok(Input::Move(Move::from_coords(row, col, config.width)))
}

fn outcome(hit: bool, sunk: bool) -> &'static str {
    match (hit, sunk) {
        (true, true) => "hit and sunk!",
        (true, false) => "hit",
        _ => "miss",
    }
}

fn print_boards(agent_fleet: &Game, human_fleet: &Game) {
    let theirs = agent_fleet.board().view_lines();
    let yours = human_fleet.board().view_lines();
    let width = theirs.first().map_or(0, String::len);
    println!();
    println!("{:<width$}    {}", "Agent's waters", "Your waters");
    for (a, b) in theirs.iter().zip(&yours) {
        println!("{a:<width$}    {b}");
    }
    println!();
}
