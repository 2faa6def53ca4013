//! Repeats the rolling-horizon solve over a grid of tuning constants and keeps the best plan.
use crate::error::SweepError;
use crate::level::{Level, Score};
use crate::solver::{run_game, SearchParams, Solution};
use serde::Serialize;
use tracing::{debug, info};

/// The discount x lookahead grid to try.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    pub discounts: Vec<f32>,
    pub lookaheads: Vec<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            discounts: vec![0.5, 0.66, 0.75],
            lookaheads: vec![1, 2, 3],
        }
    }
}

impl SweepConfig {
    /// Checks the grid is non-empty and every discount lies in `[0, 1)`.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.discounts.is_empty() || self.lookaheads.is_empty() {
            return Err(SweepError::EmptyGrid);
        }
        if let Some(&bad) = self.discounts.iter().find(|d| !(0.0..1.0).contains(*d)) {
            return Err(SweepError::InvalidDiscount(bad));
        }
        Ok(())
    }

    /// Every parameter pair, discounts in the outer loop.
    pub fn params(&self) -> impl Iterator<Item = SearchParams> + '_ {
        self.discounts.iter().flat_map(move |&discount| {
            self.lookaheads
                .iter()
                .map(move |&lookahead| SearchParams { discount, lookahead })
        })
    }
}

/// Score reached with one parameter pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Trial {
    pub params: SearchParams,
    pub score: Score,
}

/// Result of a sweep over one level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepOutcome {
    /// Plan of the first trial that reached the highest score.
    pub best: Solution,
    /// First parameter pair reaching the highest score.
    pub first: SearchParams,
    /// Last parameter pair reaching the highest score.
    pub last: SearchParams,
    /// Every trial, in grid order.
    pub trials: Vec<Trial>,
}

/// Runs [`run_game`] once per parameter pair and keeps the highest-scoring plan.
///
/// A later trial replaces the best only with a strictly higher score; ties move `last`.
///
/// # Examples
/// ```
/// use gather_solver::level::{EdgeSpec, Level};
/// use gather_solver::sweep::{sweep, SweepConfig};
///
/// let level = Level::build(2, &[EdgeSpec::undirected(0, 1)], vec![0, 5], 1, 4).unwrap();
/// let outcome = sweep(&level, &SweepConfig::default()).unwrap();
/// assert_eq!(outcome.best.score, 7);
/// assert_eq!(outcome.trials.len(), 9);
/// ```
pub fn sweep(level: &Level, config: &SweepConfig) -> Result<SweepOutcome, SweepError> {
    config.validate()?;

    let mut trials = Vec::new();
    let mut outcome: Option<SweepOutcome> = None;

    for params in config.params() {
        let solution = run_game(level, params);
        debug!(
            discount = params.discount,
            lookahead = params.lookahead,
            score = solution.score,
            "trial"
        );
        trials.push(Trial {
            params,
            score: solution.score,
        });

        if let Some(current) = outcome.as_mut() {
            if solution.score > current.best.score {
                current.first = params;
                current.last = params;
                current.best = solution;
            } else if solution.score == current.best.score {
                current.last = params;
            }
        } else {
            outcome = Some(SweepOutcome {
                best: solution,
                first: params,
                last: params,
                trials: Vec::new(),
            });
        }
    }

    let mut outcome = outcome.ok_or(SweepError::EmptyGrid)?;
    outcome.trials = trials;
    info!(
        score = outcome.best.score,
        first_discount = outcome.first.discount,
        first_lookahead = outcome.first.lookahead,
        last_discount = outcome.last.discount,
        last_lookahead = outcome.last.lookahead,
        "sweep finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::EdgeSpec;

    fn six_node_level() -> Level {
        let edges = [
            EdgeSpec::undirected(0, 1),
            EdgeSpec::undirected(0, 2),
            EdgeSpec::undirected(0, 3),
            EdgeSpec::undirected(0, 5),
            EdgeSpec::undirected(1, 2),
            EdgeSpec::undirected(2, 3),
            EdgeSpec::undirected(2, 4),
            EdgeSpec::undirected(3, 4),
            EdgeSpec::undirected(3, 5),
        ];
        Level::build(6, &edges, vec![5, 7, 6, 0, 5, 7], 2, 15).unwrap()
    }

    #[test]
    fn test_default_grid_order() {
        let params: Vec<_> = SweepConfig::default().params().collect();
        assert_eq!(params.len(), 9);
        assert_eq!(params[0], SearchParams { discount: 0.5, lookahead: 1 });
        assert_eq!(params[1], SearchParams { discount: 0.5, lookahead: 2 });
        assert_eq!(params[8], SearchParams { discount: 0.75, lookahead: 3 });
    }

    #[test]
    fn test_validate_rejects_bad_grids() {
        let empty = SweepConfig {
            discounts: vec![],
            lookaheads: vec![1],
        };
        assert_eq!(empty.validate(), Err(SweepError::EmptyGrid));

        let no_lookahead = SweepConfig {
            discounts: vec![0.5],
            lookaheads: vec![],
        };
        assert_eq!(no_lookahead.validate(), Err(SweepError::EmptyGrid));

        let too_high = SweepConfig {
            discounts: vec![0.5, 1.0],
            lookaheads: vec![1],
        };
        assert_eq!(too_high.validate(), Err(SweepError::InvalidDiscount(1.0)));

        let negative = SweepConfig {
            discounts: vec![-0.25],
            lookaheads: vec![1],
        };
        assert_eq!(negative.validate(), Err(SweepError::InvalidDiscount(-0.25)));

        assert!(SweepConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sweep_ties_track_first_and_last() {
        let level = Level::build(2, &[EdgeSpec::undirected(0, 1)], vec![0, 5], 1, 4).unwrap();
        let outcome = sweep(&level, &SweepConfig::default()).unwrap();
        assert!(outcome.trials.iter().all(|t| t.score == 7));
        assert_eq!(outcome.first, SearchParams { discount: 0.5, lookahead: 1 });
        assert_eq!(outcome.last, SearchParams { discount: 0.75, lookahead: 3 });
        assert_eq!(outcome.best.params, outcome.first);
        assert_eq!(outcome.best.plan, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_sweep_keeps_the_highest_trial() {
        let level = six_node_level();
        let outcome = sweep(&level, &SweepConfig::default()).unwrap();
        let max = outcome.trials.iter().map(|t| t.score).max().unwrap();
        assert_eq!(outcome.best.score, max);

        let winners: Vec<_> = outcome.trials.iter().filter(|t| t.score == max).collect();
        assert_eq!(outcome.first, winners[0].params);
        assert_eq!(outcome.last, winners[winners.len() - 1].params);
        assert_eq!(outcome.best, run_game(&level, outcome.first));
    }

    #[test]
    fn test_sweep_rejects_invalid_config() {
        let level = six_node_level();
        let config = SweepConfig {
            discounts: vec![1.5],
            lookaheads: vec![1],
        };
        assert_eq!(sweep(&level, &config), Err(SweepError::InvalidDiscount(1.5)));
    }
}
