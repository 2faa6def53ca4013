use crate::engine::{Arrival, GameState};
use crate::heuristics::leaf_value;
use crate::level::{Level, NodeId, Score};
use serde::Serialize;
use tracing::{debug, trace};

/// Tuning constants for one solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SearchParams {
    /// Weight in `[0, 1)` applied to carried, unbanked value at non-home leaves.
    pub discount: f32,
    /// Extra turns of lookahead on top of `carry_limit + 1`.
    pub lookahead: usize,
}

/// Represents a plan found by the solver.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution {
    /// Banked score at the end of the move budget.
    pub score: Score,
    /// Node chosen at each turn, 0-indexed.
    pub plan: Vec<NodeId>,
    /// Parameters the plan was found with.
    pub params: SearchParams,
}

impl Solution {
    /// The plan in 1-indexed node notation, as levels are written.
    pub fn display_plan(&self) -> Vec<usize> {
        self.plan.iter().map(|&n| n + 1).collect()
    }
}

/// State shared by every call of one bounded search: the level, the leaf discount and
/// the best-sequence buffer.
///
/// The buffer holds one slot per turn of the level. A call at depth `d` writes slot `d`
/// whenever one of its children beats the best score seen so far at that call, so the
/// winning branch overwrites the buffer along its own depth chain as the recursion
/// unwinds.
#[derive(Clone, Debug)]
pub struct SearchContext<'a> {
    level: &'a Level,
    discount: f32,
    best_seq: Vec<NodeId>,
    visited: u64,
}

impl<'a> SearchContext<'a> {
    pub fn new(level: &'a Level, discount: f32) -> Self {
        SearchContext {
            level,
            discount,
            best_seq: vec![level.home(); level.moves()],
            visited: 0,
        }
    }

    pub fn set_discount(&mut self, discount: f32) {
        self.discount = discount;
    }

    /// The best-sequence buffer, one slot per turn.
    pub fn best_sequence(&self) -> &[NodeId] {
        &self.best_seq
    }

    /// Number of search calls made through this context.
    pub fn visited(&self) -> u64 {
        self.visited
    }

    pub fn into_sequence(self) -> Vec<NodeId> {
        self.best_seq
    }

    /// Recursively explores every legal move sequence from `state` down to turn `max_depth`.
    ///
    /// `state.node()` is the node just arrived at; its arrival effects are applied first.
    /// At `max_depth` the state is scored with [`leaf_value`]. Otherwise the values
    /// regenerate once and every open edge is explored on its own copy of the state.
    ///
    /// `best_score` is the floor supplied by the caller: it is returned unchanged when no
    /// child beats it (including dead ends with no open edge), and only children that beat
    /// it write to the best-sequence buffer.
    ///
    /// # Panics
    /// Panics if `max_depth` exceeds the level's move budget.
    pub fn dig(&mut self, mut state: GameState, max_depth: usize, mut best_score: Score) -> Score {
        self.visited += 1;
        let level = self.level;

        state.arrive(level);

        let depth = state.turn();
        if depth >= max_depth {
            return leaf_value(level, &state, self.discount);
        }

        state.regenerate(level);
        for next in level.open_moves(state.node(), state.score()) {
            let mut child = state.clone();
            child.set_node(next);
            child.set_turn(depth + 1);

            let score = self.dig(child, max_depth, best_score);
            if score > best_score {
                best_score = score;
                self.best_seq[depth] = next;
            }
        }
        best_score
    }
}

/// Where the rolling-horizon loop is for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Search to `horizon` and commit the plan up to the next home visit.
    Lookahead { horizon: usize },
    /// The horizon reaches the move budget: one exact search to the end.
    Final,
}

fn next_phase(level: &Level, turn: usize, lookahead: usize) -> Phase {
    let horizon = level.carry_limit() + 1 + lookahead + turn;
    if horizon < level.moves() {
        Phase::Lookahead { horizon }
    } else {
        Phase::Final
    }
}

/// Plays a whole level by stitching bounded searches together.
///
/// Each turn the horizon is `carry_limit + 1 + lookahead + turn`. While it is short of the
/// move budget, a search runs to the horizon and its best sequence is played on the live
/// state until the token gets home (which banks and restarts the search from the new
/// state) or the horizon is reached. Once the horizon covers the budget, the discount is
/// set to 0 and one exact search runs to the last move; its score is the level's score.
///
/// # Examples
/// ```
/// use gather_solver::level::{EdgeSpec, Level};
/// use gather_solver::solver::{run_game, SearchParams};
///
/// let level = Level::build(2, &[EdgeSpec::undirected(0, 1)], vec![0, 5], 1, 4).unwrap();
/// let solution = run_game(&level, SearchParams { discount: 0.5, lookahead: 1 });
/// assert_eq!(solution.score, 7);
/// assert_eq!(solution.display_plan(), vec![2, 1, 2, 1]);
/// ```
pub fn run_game(level: &Level, params: SearchParams) -> Solution {
    let moves = level.moves();
    let mut ctx = SearchContext::new(level, params.discount);
    let mut state = GameState::new(level);

    while state.turn() < moves {
        match next_phase(level, state.turn(), params.lookahead) {
            Phase::Lookahead { horizon } => {
                let start = state.turn();
                let estimate = ctx.dig(state.clone(), horizon, 0);

                while state.turn() < horizon {
                    let next = ctx.best_sequence()[state.turn()];
                    if let Arrival::Banked { .. } = state.step_to(level, next) {
                        break;
                    }
                }
                debug!(
                    turn = start,
                    horizon,
                    estimate,
                    committed = state.turn() - start,
                    score = state.score(),
                    "lookahead window"
                );
            }
            Phase::Final => {
                ctx.set_discount(0.0);
                let score = ctx.dig(state.clone(), moves, 0);
                debug!(turn = state.turn(), score, "final stretch");
                trace!(visited = ctx.visited(), "search finished");
                return Solution {
                    score,
                    plan: ctx.into_sequence(),
                    params,
                };
            }
        }
    }

    // Only reached when the level has no moves at all.
    Solution {
        score: 0,
        plan: ctx.into_sequence(),
        params,
    }
}

/// Suggests the next move from `state` with one lookahead window of `params`.
///
/// The window and discount are the ones [`run_game`] would use from this turn. Returns `None` once the budget is spent or when the search finds no open move.
pub fn suggest_move(level: &Level, state: &GameState, params: SearchParams) -> Option<NodeId> {
    let turn = state.turn();
    if turn >= level.moves() {
        return None;
    }
    let (horizon, discount) = match next_phase(level, turn, params.lookahead) {
        Phase::Lookahead { horizon } => (horizon, params.discount),
        Phase::Final => (level.moves(), 0.0),
    };
    let mut ctx = SearchContext::new(level, discount);
    ctx.dig(state.clone(), horizon, 0);
    let next = ctx.best_sequence()[turn];
    level.can_move(state.node(), next, state.score()).then_some(next)
}

/// Runs one exact search over the whole move budget from the start of the level.
///
/// Cost grows with the branching factor raised to the move budget, so this is only
/// practical for short levels. It bounds what [`run_game`] can reach on the same level.
pub fn solve_exhaustive(level: &Level) -> Solution {
    let mut ctx = SearchContext::new(level, 0.0);
    let score = ctx.dig(GameState::new(level), level.moves(), 0);
    Solution {
        score,
        plan: ctx.into_sequence(),
        params: SearchParams {
            discount: 0.0,
            lookahead: level.moves(),
        },
    }
}
