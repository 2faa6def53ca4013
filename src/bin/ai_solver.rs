use clap::Parser;
use gather_solver::logging::init_logging;
use gather_solver::sweep::{sweep, SweepConfig, SweepOutcome};
use gather_solver::utils::{extract_levels, parse_level_specs, RawLevel};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Only solve this level (1-indexed, in document order)
    #[clap(short, long)]
    level: Option<usize>,

    /// Leaf discounts to sweep, each in [0, 1)
    #[clap(long, value_delimiter = ',', default_values_t = vec![0.5, 0.66, 0.75])]
    discounts: Vec<f32>,

    /// Extra lookahead turns to sweep
    #[clap(long, value_delimiter = ',', default_values_t = vec![1, 2, 3])]
    lookaheads: Vec<usize>,

    /// Print results as JSON instead of text
    #[clap(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read the file as a JSON array of level specs (0-indexed nodes)
    #[clap(long)]
    spec: bool,

    /// Path to the level document containing `levels[N] = "..."` records,
    /// or to a JSON level spec file with `--spec`
    levels_file: PathBuf,
}

#[derive(Serialize)]
struct LevelReport {
    level: usize,
    outcome: SweepOutcome,
    plan: Vec<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let start = Instant::now();
    let document = match fs::read_to_string(&args.levels_file) {
        Ok(document) => document,
        Err(e) => {
            error!(path = %args.levels_file.display(), "failed to read level document: {e}");
            return ExitCode::FAILURE;
        }
    };

    let levels = if args.spec {
        match parse_level_specs(&document) {
            Ok(levels) => levels,
            Err(e) => {
                error!(path = %args.levels_file.display(), "failed to read level specs: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        extract_levels(&document)
            .iter()
            .map(RawLevel::to_level)
            .collect()
    };
    if levels.is_empty() {
        error!(path = %args.levels_file.display(), "no levels found");
        return ExitCode::FAILURE;
    }
    info!(count = levels.len(), spec = args.spec, "levels loaded");

    let config = SweepConfig {
        discounts: args.discounts.clone(),
        lookaheads: args.lookaheads.clone(),
    };
    if let Err(e) = config.validate() {
        error!("invalid sweep parameters: {e}");
        return ExitCode::FAILURE;
    }

    let mut reports = Vec::new();
    for (i, level) in levels.into_iter().enumerate() {
        let number = i + 1;
        if args.level.is_some_and(|wanted| wanted != number) {
            continue;
        }

        let level = match level {
            Ok(level) => level,
            Err(e) => {
                warn!(level = number, "skipping malformed level: {e}");
                continue;
            }
        };

        let outcome = match sweep(&level, &config) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(level = number, "sweep failed: {e}");
                return ExitCode::FAILURE;
            }
        };

        let plan = outcome.best.display_plan();
        if !args.json {
            println!(
                "Level {}\tHigh Score - {}\nFirst p-{}, d-{}\tLast p-{}, d-{}\nFrom Seq - {:?}\n",
                number,
                outcome.best.score,
                outcome.first.lookahead,
                outcome.first.discount,
                outcome.last.lookahead,
                outcome.last.discount,
                plan
            );
        }
        reports.push(LevelReport {
            level: number,
            outcome,
            plan,
        });
    }

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("failed to serialize results: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Solved {} levels in {:?}", reports.len(), start.elapsed());
    }
    ExitCode::SUCCESS
}
