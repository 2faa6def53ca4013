//! # Gather Solver Library
//!
//! This library provides the game model for the gather puzzle, where a token walks a small
//! graph collecting regenerating node values into a fixed number of carry slots and banks
//! them by returning home, and a rolling-horizon search that plans the whole move budget.
//!
//! It is used by three binaries:
//! - `ai_solver`: Reads a level document, sweeps the tuning constants for each level and
//!   prints the best score and 1-indexed plan.
//! - `human_player`: Allows interactive play of one level via the command line.
//! - `heuristic_evaluator`: Runs the parameter grid over seeded random levels and reports
//!   the average score of each parameter pair.
//!
//! ## Modules
//! - `level`: The static level model (`Level`, `EdgeConstraint`, `EdgeSpec`).
//! - `engine`: Game state, the per-turn transition (regen, banking, carry swaps) and `Game`
//!   for live play with undo.
//! - `heuristics`: Valuation of unfinished search leaves.
//! - `solver`: The bounded search (`SearchContext::dig`) and the rolling-horizon
//!   controller (`run_game`).
//! - `sweep`: Repeats `run_game` over a grid of parameters and keeps the best plan.
//! - `utils`: Parsing levels from their compact notation and from level documents.
//! - `error`: Error types.
//! - `logging`: `tracing` subscriber setup for the binaries.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod level;
pub mod logging;
pub mod solver;
pub mod sweep;
pub mod utils;

pub use crate::level::Level;
pub use crate::solver::{run_game, SearchParams, Solution};
pub use crate::sweep::{sweep, SweepConfig, SweepOutcome};
