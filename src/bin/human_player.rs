use clap::Parser;
use gather_solver::engine::{Arrival, Game};
use gather_solver::logging::init_logging;
use gather_solver::solver::{suggest_move, SearchParams};
use gather_solver::utils::extract_levels;
use gather_solver::Level;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const HINT_PARAMS: SearchParams = SearchParams {
    discount: 0.66,
    lookahead: 1,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Level to play (1-indexed, in document order)
    #[clap(short, long, default_value_t = 1)]
    level: usize,

    /// Path to the level document containing `levels[N] = "..."` records
    levels_file: PathBuf,
}

fn load_level(args: &Args) -> Result<Level, String> {
    let document = fs::read_to_string(&args.levels_file)
        .map_err(|e| format!("Failed to read file: {}", e))?;
    let raw_levels = extract_levels(&document);
    let raw = args
        .level
        .checked_sub(1)
        .and_then(|i| raw_levels.get(i))
        .ok_or_else(|| format!("Level {} not found ({} levels in file)", args.level, raw_levels.len()))?;
    raw.to_level().map_err(|e| format!("Invalid level: {}", e))
}

fn print_status(game: &Game) {
    let state = game.state();
    let carry: Vec<String> = state
        .carry()
        .iter()
        .map(|&n| {
            if game.level().is_home(n) {
                "-".to_string()
            } else {
                format!("{}({})", n + 1, state.values()[n])
            }
        })
        .collect();
    let values: Vec<String> = state.values().iter().map(|v| v.to_string()).collect();
    println!(
        "Turn: {}/{}, Score: {}, At node: {}",
        state.turn(),
        game.level().moves(),
        state.score(),
        state.node() + 1
    );
    println!(
        "Carry: [{}] worth {}  Node values: {}",
        carry.join(", "),
        state.carried_value(),
        values.join(",")
    );
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(0);

    let level = match load_level(&args) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut game = Game::new(&level);
    println!("Welcome to Gather!\n\n{}", level);

    loop {
        println!("---------------------");
        print_status(&game);

        if game.is_over() {
            println!("");
            println!("---------------------");
            println!("GAME OVER!");
            println!("Final Score: {}", game.score());
            let plan: Vec<String> = game.plan().iter().map(|n| (n + 1).to_string()).collect();
            println!("Moves: {}", plan.join(","));
            println!("---------------------");
            break;
        }

        let legal: Vec<String> = game.legal_moves().iter().map(|n| (n + 1).to_string()).collect();
        println!("Legal moves: {}", legal.join(", "));
        print!("Enter a node to move to, 'h' for a hint, 'u' to undo, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Error reading input. Please try again.");
            continue;
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => {
                if game.undo_last_move() {
                    println!("Move undone.");
                } else {
                    println!("Cannot undo further (no moves made).");
                }
            }
            "h" => match suggest_move(&level, game.state(), HINT_PARAMS) {
                Some(node) => println!("Try node {}.", node + 1),
                None => println!("No hint available."),
            },
            other => match other.parse::<usize>() {
                Ok(node) if node >= 1 => match game.process_move(node - 1) {
                    Ok(Arrival::Banked { gained }) => println!("Home! Banked {} points.", gained),
                    Ok(Arrival::Claimed { evicted, .. }) if level.is_home(evicted) => {
                        println!("Picked up node {}.", node)
                    }
                    Ok(Arrival::Claimed { evicted, .. }) => {
                        println!("Picked up node {}, dropped node {}.", node, evicted + 1)
                    }
                    Ok(Arrival::Held) => println!("Already carrying node {}.", node),
                    Ok(Arrival::Passed) => println!("Node {} is not worth carrying.", node),
                    Err(e) => println!("Invalid move: {}", e),
                },
                _ => println!("Invalid input: enter a node number (e.g. '3'), 'h', 'u', or 'q'."),
            },
        }
    }
    ExitCode::SUCCESS
}
