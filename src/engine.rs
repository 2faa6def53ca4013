//! Simulation state and move transitions for a gather level.
//!
//! This module defines:
//! - `GameState`: the mutable state of one playthrough (token position, banked score,
//!   per-node current values, carry slots, turn counter).
//! - `Arrival`: what happened when the token arrived at a node.
//! - `Game`: a live session on top of `GameState` that checks move legality, keeps a
//!   history for undo and can replay a whole plan.
//!
//! The same transition (`GameState::regenerate` followed by `GameState::arrive`) is used
//! by the search in `solver` and by live play, so a plan found by the search scores the
//! same when it is executed here.
use crate::error::EngineError;
use crate::level::{Level, NodeId, Score, Value};

/// Outcome of the token arriving at a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrival {
    /// Arrived home; every carry slot was unloaded for `gained` points.
    Banked { gained: Score },
    /// The node's value beat the weakest carried item, which was evicted from `slot`.
    Claimed { slot: usize, evicted: NodeId },
    /// The node is already carried; nothing changes.
    Held,
    /// The node's value did not beat the weakest carried item.
    Passed,
}

/// Mutable state of one playthrough.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    node: NodeId,
    score: Score,
    carry: Vec<NodeId>,
    values: Vec<Value>,
    turn: usize,
}

impl GameState {
    /// Fresh state at the start of a level: at home, every carry slot holding home,
    /// every node at its max value, turn 0.
    pub fn new(level: &Level) -> Self {
        GameState {
            node: level.home(),
            score: 0,
            carry: vec![level.home(); level.carry_limit()],
            values: level.max_values().to_vec(),
            turn: 0,
        }
    }

    /// Builds a state from explicit parts. Values are clamped to each node's capacity.
    ///
    /// # Panics
    /// Panics if `values` does not hold exactly one entry per node of `level`, or if
    /// `carry` does not hold `carry_limit` slots.
    pub fn from_parts(
        level: &Level,
        node: NodeId,
        score: Score,
        carry: Vec<NodeId>,
        values: Vec<Value>,
        turn: usize,
    ) -> Self {
        assert_eq!(values.len(), level.node_count(), "one value per node");
        assert_eq!(carry.len(), level.carry_limit(), "one entry per carry slot");
        let values = values
            .iter()
            .enumerate()
            .map(|(i, &v)| v.min(level.max_value(i)))
            .collect();
        GameState {
            node,
            score,
            carry,
            values,
            turn,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Banked score so far.
    pub fn score(&self) -> Score {
        self.score
    }

    pub fn carry(&self) -> &[NodeId] {
        &self.carry
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of turns already played.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Value currently claimed by the carry slots (not yet banked).
    pub fn carried_value(&self) -> Score {
        self.carry.iter().map(|&n| self.values[n]).sum()
    }

    pub(crate) fn set_node(&mut self, node: NodeId) {
        self.node = node;
    }

    pub(crate) fn set_turn(&mut self, turn: usize) {
        self.turn = turn;
    }

    /// Adds one unit to every node still below its capacity.
    pub fn regenerate(&mut self, level: &Level) {
        for (i, v) in self.values.iter_mut().enumerate() {
            if *v < level.max_value(i) {
                *v += 1;
            }
        }
    }

    /// Applies the arrival effects for the node the token currently sits on.
    ///
    /// * Home: every slot's value is banked, that node's value is reset to 0 and the slot
    ///   is refilled with home.
    /// * A node already carried: nothing happens.
    /// * Any other node: the slot holding the lowest value (first such slot on ties) is
    ///   replaced if the node's current value is strictly higher.
    ///
    /// Applying it twice in a row is a no-op the second time.
    pub fn arrive(&mut self, level: &Level) -> Arrival {
        let node = self.node;

        if level.is_home(node) {
            let mut gained = 0;
            for slot in self.carry.iter_mut() {
                gained += self.values[*slot];
                self.values[*slot] = 0;
                *slot = node;
            }
            self.score += gained;
            return Arrival::Banked { gained };
        }

        if self.carry.contains(&node) {
            return Arrival::Held;
        }

        let mut min_slot = 0;
        let mut min_value = self.values[self.carry[0]];
        for (i, &carried) in self.carry.iter().enumerate().skip(1) {
            if self.values[carried] < min_value {
                min_value = self.values[carried];
                min_slot = i;
            }
        }

        if self.values[node] > min_value {
            let evicted = self.carry[min_slot];
            self.carry[min_slot] = node;
            Arrival::Claimed {
                slot: min_slot,
                evicted,
            }
        } else {
            Arrival::Passed
        }
    }

    /// Plays one turn: advances the turn counter, regenerates, moves to `to` and applies
    /// its arrival effects. Legality is not checked here; see [`Game::process_move`].
    pub fn step_to(&mut self, level: &Level, to: NodeId) -> Arrival {
        self.turn += 1;
        self.regenerate(level);
        self.node = to;
        self.arrive(level)
    }
}

/// A live session on one level.
///
/// # Examples
/// ```
/// use gather_solver::engine::{Arrival, Game};
/// use gather_solver::level::{EdgeSpec, Level};
///
/// let level = Level::build(2, &[EdgeSpec::undirected(0, 1)], vec![0, 5], 1, 4).unwrap();
/// let mut game = Game::new(&level);
/// game.process_move(1).unwrap();
/// assert_eq!(game.process_move(0).unwrap(), Arrival::Banked { gained: 5 });
/// assert!(game.process_move(0).is_err()); // no self loop at home
/// assert!(game.undo_last_move());
/// assert_eq!(game.score(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Game<'a> {
    level: &'a Level,
    state: GameState,
    plan: Vec<NodeId>,
    history: Vec<GameState>,
}

impl<'a> Game<'a> {
    pub fn new(level: &'a Level) -> Self {
        Game {
            level,
            state: GameState::new(level),
            plan: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Replays a complete plan from the start of the level.
    ///
    /// # Errors
    /// * [`EngineError::PlanLength`] if the plan does not use exactly the move budget.
    /// * [`EngineError::IllegalMove`] at the first move whose edge is closed.
    pub fn replay(level: &'a Level, plan: &[NodeId]) -> Result<Self, EngineError> {
        if plan.len() != level.moves() {
            return Err(EngineError::PlanLength {
                expected: level.moves(),
                found: plan.len(),
            });
        }
        let mut game = Game::new(level);
        for &to in plan {
            game.process_move(to)?;
        }
        Ok(game)
    }

    pub fn level(&self) -> &Level {
        self.level
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> Score {
        self.state.score()
    }

    /// Moves played so far, 0-indexed.
    pub fn plan(&self) -> &[NodeId] {
        &self.plan
    }

    pub fn moves_left(&self) -> usize {
        self.level.moves().saturating_sub(self.state.turn())
    }

    pub fn is_over(&self) -> bool {
        self.moves_left() == 0
    }

    /// Nodes that can be moved to from the current position at the current score.
    pub fn legal_moves(&self) -> Vec<NodeId> {
        if self.is_over() {
            return Vec::new();
        }
        self.level
            .open_moves(self.state.node(), self.state.score())
            .collect()
    }

    /// Moves the token to `to` if the edge is open, and records the prior state for undo.
    pub fn process_move(&mut self, to: NodeId) -> Result<Arrival, EngineError> {
        if self.is_over() {
            return Err(EngineError::OutOfMoves {
                moves: self.level.moves(),
            });
        }
        let from = self.state.node();
        if to >= self.level.node_count() || !self.level.can_move(from, to, self.state.score()) {
            return Err(EngineError::IllegalMove {
                from,
                to,
                score: self.state.score(),
            });
        }

        self.history.push(self.state.clone());
        self.plan.push(to);
        Ok(self.state.step_to(self.level, to))
    }

    /// Reverts the last move. Returns `false` if no move has been made.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.plan.pop();
                true
            }
            None => false,
        }
    }
}
