use gather_solver::logging::init_logging;
use gather_solver::solver::run_game;
use gather_solver::sweep::SweepConfig;
use gather_solver::Level;

const NUM_RANDOM_LEVELS_FOR_EVALUATION: usize = 20;
const START_SEED: u64 = 0;
const NODES_PER_LEVEL: usize = 6;

fn main() {
    init_logging(0);
    let config = SweepConfig::default();
    let grid: Vec<_> = config.params().collect();

    let mut totals = vec![0u64; grid.len()];
    let mut wins = vec![0usize; grid.len()];

    println!(
        "Starting parameter evaluation for {} levels...",
        NUM_RANDOM_LEVELS_FOR_EVALUATION
    );

    for level_idx in 0..NUM_RANDOM_LEVELS_FOR_EVALUATION {
        let seed = START_SEED + level_idx as u64;
        let level = Level::new_random_with_seed(seed, NODES_PER_LEVEL);
        println!(
            "\nEvaluating Level {} (Seed: {}, carry {}, moves {})",
            level_idx,
            seed,
            level.carry_limit(),
            level.moves()
        );

        let scores: Vec<u32> = grid.iter().map(|&params| run_game(&level, params).score).collect();
        let best = scores.iter().copied().max().unwrap_or(0);

        for (i, (params, score)) in grid.iter().zip(&scores).enumerate() {
            println!(
                "  d: {:<5} p: {:<3} Score: {}",
                params.discount, params.lookahead, score
            );
            totals[i] += *score as u64;
            if *score == best {
                wins[i] += 1;
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of levels evaluated: {}", NUM_RANDOM_LEVELS_FOR_EVALUATION);
    println!("\n--- Average Scores ---");

    let mut ranked: Vec<(usize, f64)> = totals
        .iter()
        .enumerate()
        .map(|(i, &total)| (i, total as f64 / NUM_RANDOM_LEVELS_FOR_EVALUATION as f64))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (i, avg) in ranked {
        println!(
            "d: {:<5} p: {:<3}: Average Score = {:.2}, Best on {} levels",
            grid[i].discount, grid[i].lookahead, avg, wins[i]
        );
    }
}
