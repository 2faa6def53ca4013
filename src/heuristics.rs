use crate::engine::GameState;
use crate::level::{Level, NodeId, Score};

/// Counts the carry slots currently holding home, i.e. the free slots.
///
/// Used by [`carry_estimate`] as a rough proxy for how many more turns the token will
/// wander before it returns home.
pub fn empty_slots(level: &Level, carry: &[NodeId]) -> usize {
    carry.iter().filter(|&&n| level.is_home(n)).count()
}

/// Estimates what the carried items will be worth when they are eventually banked.
///
/// Each carried node is assumed to keep regenerating for `empty_slots + 1` more turns,
/// capped at its max value, and the result is weighted by `discount`. The products are
/// summed as `f32` before the caller truncates, so rounding happens once for the set
/// rather than item by item.
///
/// The `+ 1` and the choice of free slots rather than path distance to home are
/// empirically tuned, not derived.
pub fn carry_estimate(level: &Level, state: &GameState, discount: f32) -> f32 {
    let turns_out = (empty_slots(level, state.carry()) + 1) as Score;
    state
        .carry()
        .iter()
        .map(|&n| {
            let projected = (state.values()[n] + turns_out).min(level.max_value(n));
            projected as f32 * discount
        })
        .sum()
}

/// Scores a search leaf.
///
/// At home the banked score is exact and returned as is. Anywhere else the truncated
/// [`carry_estimate`] is added on top of the banked score.
///
/// # Examples
/// ```
/// use gather_solver::engine::GameState;
/// use gather_solver::heuristics::leaf_value;
/// use gather_solver::level::{EdgeSpec, Level};
///
/// let level = Level::build(2, &[EdgeSpec::undirected(0, 1)], vec![0, 5], 1, 4).unwrap();
/// let state = GameState::from_parts(&level, 1, 5, vec![1], vec![0, 1], 3);
/// // min(1 + 0 free slots + 1, 5) = 2, weighted by 0.5.
/// assert_eq!(leaf_value(&level, &state, 0.5), 6);
/// assert_eq!(leaf_value(&level, &state, 0.0), 5);
/// ```
pub fn leaf_value(level: &Level, state: &GameState, discount: f32) -> Score {
    if level.is_home(state.node()) {
        return state.score();
    }
    state.score() + carry_estimate(level, state, discount) as Score
}
