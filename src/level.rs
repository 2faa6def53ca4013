//! Static description of a gather level.
//!
//! This module defines the read-only model a level is solved against:
//! - `EdgeConstraint`: whether a move between two nodes exists and the banked-score
//!   window in which it is open.
//! - `EdgeSpec` / `Conditional`: the raw edge records a level is built from.
//! - `LevelSpec`: the full supply record (nodes, edges, capacities, carry limit, moves).
//! - `Level`: the validated model, built once per level and never mutated.
use crate::error::LevelError;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fmt;

/// Index of a node, `0..node_count`.
pub type NodeId = usize;

/// Banked score. `moves * max(max_value)` must fit; this is not checked at runtime.
pub type Score = u32;

/// Amount of resource sitting at a node.
pub type Value = u32;

/// Legality and score gating for one ordered pair of nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeConstraint {
    /// Whether a move from the row node to the column node exists at all.
    pub legal: bool,
    /// Lowest banked score (inclusive) at which the move is open.
    pub min_score: Score,
    /// Highest banked score (inclusive) at which the move is open.
    pub max_score: Score,
}

impl EdgeConstraint {
    /// The default cell: no edge, ungated.
    pub const CLOSED: EdgeConstraint = EdgeConstraint {
        legal: false,
        min_score: 0,
        max_score: Score::MAX,
    };

    /// Returns `true` if the move exists and `score` lies within `[min_score, max_score]`.
    ///
    /// # Examples
    /// ```
    /// use gather_solver::level::EdgeConstraint;
    /// let gated = EdgeConstraint { legal: true, min_score: 51, max_score: u32::MAX };
    /// assert!(!gated.is_open_at(50));
    /// assert!(gated.is_open_at(51));
    /// assert!(!EdgeConstraint::CLOSED.is_open_at(0));
    /// ```
    pub fn is_open_at(&self, score: Score) -> bool {
        self.legal && score >= self.min_score && score <= self.max_score
    }
}

impl Default for EdgeConstraint {
    fn default() -> Self {
        EdgeConstraint::CLOSED
    }
}

/// Which side of the threshold the banked score must be on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Score must be strictly greater than the threshold.
    GreaterThan,
    /// Score must be strictly less than the threshold.
    LessThan,
}

/// A single score condition attached to an edge pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Conditional {
    pub kind: ConditionKind,
    pub threshold: Score,
}

impl Conditional {
    pub fn greater_than(threshold: Score) -> Self {
        Conditional {
            kind: ConditionKind::GreaterThan,
            threshold,
        }
    }

    pub fn less_than(threshold: Score) -> Self {
        Conditional {
            kind: ConditionKind::LessThan,
            threshold,
        }
    }
}

/// One raw edge record, 0-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct EdgeSpec {
    pub from: NodeId,
    pub to: NodeId,
    /// `true` for `from -> to` only; `false` allows both directions.
    #[serde(default)]
    pub directed: bool,
    /// Applies to both directions between `from` and `to`, even when the edge is directed.
    #[serde(default)]
    pub conditional: Option<Conditional>,
}

impl EdgeSpec {
    pub fn undirected(from: NodeId, to: NodeId) -> Self {
        EdgeSpec {
            from,
            to,
            directed: false,
            conditional: None,
        }
    }

    pub fn directed(from: NodeId, to: NodeId) -> Self {
        EdgeSpec {
            from,
            to,
            directed: true,
            conditional: None,
        }
    }

    pub fn with_conditional(mut self, conditional: Conditional) -> Self {
        self.conditional = Some(conditional);
        self
    }
}

/// Everything an external source supplies to describe one level.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LevelSpec {
    pub node_count: usize,
    pub edges: Vec<EdgeSpec>,
    pub max_values: Vec<Value>,
    pub carry_limit: usize,
    pub moves: usize,
}

/// Largest node count produced by [`Level::new_random_with_seed`].
pub const MAX_RANDOM_NODES: usize = 8;

/// A validated, immutable level.
///
/// Holds the full `node_count x node_count` edge table, the per-node capacities,
/// the index of the unique home node, the number of carry slots and the move budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    node_count: usize,
    edges: Vec<EdgeConstraint>,
    max_values: Vec<Value>,
    home: NodeId,
    carry_limit: usize,
    moves: usize,
}

impl Level {
    /// Builds a level from raw edge records and per-node capacities.
    ///
    /// Every cell of the edge table starts as [`EdgeConstraint::CLOSED`]. Each edge spec
    /// opens its direction(s); a conditional tightens `min_score` (for `GreaterThan`) or
    /// `max_score` (for `LessThan`) on both directions of the pair.
    ///
    /// # Errors
    /// * [`LevelError::ValueCountMismatch`] if `max_values.len() != node_count`.
    /// * [`LevelError::MissingHome`] / [`LevelError::MultipleHomes`] unless exactly one
    ///   capacity is 0.
    /// * [`LevelError::NoCarrySlots`] if `carry_limit == 0`.
    /// * [`LevelError::NodeOutOfRange`] if an edge names a node `>= node_count`.
    /// * [`LevelError::UnsatisfiableConditional`] for a "less than 0" clause.
    ///
    /// # Examples
    /// ```
    /// use gather_solver::level::{EdgeSpec, Level};
    /// let level = Level::build(2, &[EdgeSpec::undirected(0, 1)], vec![0, 5], 1, 4).unwrap();
    /// assert_eq!(level.home(), 0);
    /// assert!(level.edge(1, 0).legal);
    /// ```
    pub fn build(
        node_count: usize,
        edge_specs: &[EdgeSpec],
        max_values: Vec<Value>,
        carry_limit: usize,
        moves: usize,
    ) -> Result<Self, LevelError> {
        if max_values.len() != node_count {
            return Err(LevelError::ValueCountMismatch {
                expected: node_count,
                found: max_values.len(),
            });
        }

        let homes: Vec<NodeId> = max_values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect();
        let home = match homes.as_slice() {
            [] => return Err(LevelError::MissingHome),
            [home] => *home,
            _ => return Err(LevelError::MultipleHomes { homes }),
        };

        if carry_limit == 0 {
            return Err(LevelError::NoCarrySlots);
        }

        let mut edges = vec![EdgeConstraint::CLOSED; node_count * node_count];
        for spec in edge_specs {
            for node in [spec.from, spec.to] {
                if node >= node_count {
                    return Err(LevelError::NodeOutOfRange { node, node_count });
                }
            }
            let (i, j) = (spec.from, spec.to);

            edges[i * node_count + j].legal = true;
            if !spec.directed {
                edges[j * node_count + i].legal = true;
            }

            if let Some(conditional) = spec.conditional {
                for cell in [i * node_count + j, j * node_count + i] {
                    match conditional.kind {
                        ConditionKind::GreaterThan => {
                            edges[cell].min_score = conditional.threshold.saturating_add(1);
                        }
                        ConditionKind::LessThan => {
                            edges[cell].max_score = conditional
                                .threshold
                                .checked_sub(1)
                                .ok_or(LevelError::UnsatisfiableConditional { from: i, to: j })?;
                        }
                    }
                }
            }
        }

        Ok(Level {
            node_count,
            edges,
            max_values,
            home,
            carry_limit,
            moves,
        })
    }

    /// Builds a level from a [`LevelSpec`] supply record.
    pub fn from_spec(spec: &LevelSpec) -> Result<Self, LevelError> {
        Level::build(
            spec.node_count,
            &spec.edges,
            spec.max_values.clone(),
            spec.carry_limit,
            spec.moves,
        )
    }

    /// Generates a reproducible random level from `seed`.
    ///
    /// `node_count` is clamped to `2..=MAX_RANDOM_NODES`. The level always has exactly one
    /// home, and a random tree of undirected, ungated edges keeps every node reachable
    /// from home. A handful of extra edges are added on top, some directed and some gated
    /// behind a "score greater than K" condition.
    pub fn new_random_with_seed(seed: u64, node_count: usize) -> Self {
        let node_count = node_count.clamp(2, MAX_RANDOM_NODES);
        let mut rng = SmallRng::seed_from_u64(seed);

        let home = rng.gen_range(0..node_count);
        let max_values: Vec<Value> = (0..node_count)
            .map(|n| if n == home { 0 } else { rng.gen_range(1..=9) })
            .collect();

        let mut order: Vec<NodeId> = (0..node_count).collect();
        order.shuffle(&mut rng);

        let mut edge_specs = Vec::new();
        let mut linked = vec![false; node_count * node_count];
        for k in 1..order.len() {
            let (a, b) = (order[k], order[rng.gen_range(0..k)]);
            linked[a * node_count + b] = true;
            linked[b * node_count + a] = true;
            edge_specs.push(EdgeSpec::undirected(a, b));
        }

        for a in 0..node_count {
            for b in (a + 1)..node_count {
                if linked[a * node_count + b] || !rng.gen_bool(0.3) {
                    continue;
                }
                let mut spec = if rng.gen_bool(0.3) {
                    EdgeSpec::directed(a, b)
                } else {
                    EdgeSpec::undirected(a, b)
                };
                if rng.gen_bool(0.2) {
                    spec = spec.with_conditional(Conditional::greater_than(rng.gen_range(5..=30)));
                }
                edge_specs.push(spec);
            }
        }

        let carry_limit = rng.gen_range(1..=3);
        let moves = rng.gen_range(10..=18);

        match Level::build(node_count, &edge_specs, max_values, carry_limit, moves) {
            Ok(level) => level,
            Err(e) => unreachable!("generated level failed validation: {e}"),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The unique node whose capacity is 0.
    pub fn home(&self) -> NodeId {
        self.home
    }

    pub fn is_home(&self, node: NodeId) -> bool {
        self.max_values[node] == 0
    }

    pub fn max_value(&self, node: NodeId) -> Value {
        self.max_values[node]
    }

    pub fn max_values(&self) -> &[Value] {
        &self.max_values
    }

    pub fn carry_limit(&self) -> usize {
        self.carry_limit
    }

    /// Total move budget for the level.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Returns the constraint for moving from `from` to `to`.
    ///
    /// # Panics
    /// Panics if either index is `>= node_count`.
    pub fn edge(&self, from: NodeId, to: NodeId) -> EdgeConstraint {
        self.edges[from * self.node_count + to]
    }

    /// Returns `true` if moving from `from` to `to` is allowed at banked `score`.
    pub fn can_move(&self, from: NodeId, to: NodeId, score: Score) -> bool {
        self.edge(from, to).is_open_at(score)
    }

    /// Nodes reachable in one move from `from` at banked `score`, in ascending index order.
    pub fn open_moves(&self, from: NodeId, score: Score) -> impl Iterator<Item = NodeId> + '_ {
        let row = &self.edges[from * self.node_count..(from + 1) * self.node_count];
        row.iter()
            .enumerate()
            .filter(move |(_, edge)| edge.is_open_at(score))
            .map(|(to, _)| to)
    }
}

impl fmt::Display for Level {
    /// Summarises the level using 1-indexed node numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Nodes: {}  Home: {}  Carry limit: {}  Moves: {}",
            self.node_count,
            self.home + 1,
            self.carry_limit,
            self.moves
        )?;
        let values: Vec<String> = self.max_values.iter().map(|v| v.to_string()).collect();
        writeln!(f, "Max values: {}", values.join(","))?;
        for from in 0..self.node_count {
            let targets: Vec<String> = (0..self.node_count)
                .filter(|&to| self.edge(from, to).legal)
                .map(|to| {
                    let edge = self.edge(from, to);
                    let mut s = (to + 1).to_string();
                    if edge.min_score > 0 {
                        s.push_str(&format!("(>={})", edge.min_score));
                    }
                    if edge.max_score < Score::MAX {
                        s.push_str(&format!("(<={})", edge.max_score));
                    }
                    s
                })
                .collect();
            writeln!(f, "  {} -> [{}]", from + 1, targets.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<EdgeSpec> {
        vec![
            EdgeSpec::undirected(0, 1),
            EdgeSpec::directed(1, 2),
            EdgeSpec::undirected(2, 0),
        ]
    }

    #[test]
    fn test_build_defaults_every_cell_closed() {
        let level = Level::build(3, &[], vec![0, 4, 4], 1, 5).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(level.edge(i, j), EdgeConstraint::CLOSED);
            }
        }
    }

    #[test]
    fn test_build_directed_and_undirected_edges() {
        let level = Level::build(3, &triangle(), vec![0, 4, 6], 2, 8).unwrap();
        assert!(level.edge(0, 1).legal);
        assert!(level.edge(1, 0).legal);
        assert!(level.edge(1, 2).legal);
        assert!(!level.edge(2, 1).legal, "directed edge must not open the reverse direction");
        assert!(level.edge(2, 0).legal);
        assert!(level.edge(0, 2).legal);
        assert_eq!(level.home(), 0);
        assert_eq!(level.carry_limit(), 2);
        assert_eq!(level.moves(), 8);
    }

    #[test]
    fn test_greater_than_gate_is_strict_in_both_directions() {
        let edges = [EdgeSpec::undirected(0, 1).with_conditional(Conditional::greater_than(50))];
        let level = Level::build(2, &edges, vec![0, 3], 1, 3).unwrap();
        for (a, b) in [(0, 1), (1, 0)] {
            assert!(!level.can_move(a, b, 0));
            assert!(!level.can_move(a, b, 50));
            assert!(level.can_move(a, b, 51));
            assert!(level.can_move(a, b, 500));
        }
    }

    #[test]
    fn test_less_than_gate_is_strict() {
        let edges = [EdgeSpec::undirected(0, 1).with_conditional(Conditional::less_than(20))];
        let level = Level::build(2, &edges, vec![0, 3], 1, 3).unwrap();
        assert!(level.can_move(1, 0, 19));
        assert!(!level.can_move(1, 0, 20));
        assert!(!level.can_move(0, 1, 21));
    }

    #[test]
    fn test_conditional_on_directed_edge_gates_the_pair() {
        let edges = [
            EdgeSpec::undirected(0, 1),
            EdgeSpec::directed(1, 0).with_conditional(Conditional::greater_than(10)),
        ];
        let level = Level::build(2, &edges, vec![0, 3], 1, 3).unwrap();
        assert_eq!(level.edge(0, 1).min_score, 11);
        assert_eq!(level.edge(1, 0).min_score, 11);
        assert!(!level.can_move(0, 1, 10));
    }

    #[test]
    fn test_less_than_zero_is_rejected() {
        let edges = [EdgeSpec::undirected(0, 1).with_conditional(Conditional::less_than(0))];
        assert_eq!(
            Level::build(2, &edges, vec![0, 3], 1, 3),
            Err(LevelError::UnsatisfiableConditional { from: 0, to: 1 })
        );
    }

    #[test]
    fn test_out_of_range_edge_is_rejected() {
        let edges = [EdgeSpec::undirected(0, 3)];
        assert_eq!(
            Level::build(3, &edges, vec![0, 1, 1], 1, 3),
            Err(LevelError::NodeOutOfRange { node: 3, node_count: 3 })
        );
    }

    #[test]
    fn test_missing_home_is_rejected() {
        assert_eq!(
            Level::build(2, &[EdgeSpec::undirected(0, 1)], vec![1, 2], 1, 3),
            Err(LevelError::MissingHome)
        );
    }

    #[test]
    fn test_multiple_homes_are_rejected() {
        assert_eq!(
            Level::build(3, &[], vec![0, 2, 0], 1, 3),
            Err(LevelError::MultipleHomes { homes: vec![0, 2] })
        );
    }

    #[test]
    fn test_value_count_mismatch_and_zero_carry() {
        assert_eq!(
            Level::build(3, &[], vec![0, 2], 1, 3),
            Err(LevelError::ValueCountMismatch { expected: 3, found: 2 })
        );
        assert_eq!(Level::build(2, &[], vec![0, 2], 0, 3), Err(LevelError::NoCarrySlots));
    }

    #[test]
    fn test_open_moves_respects_gates() {
        let edges = [
            EdgeSpec::undirected(0, 1),
            EdgeSpec::undirected(0, 2).with_conditional(Conditional::greater_than(5)),
        ];
        let level = Level::build(3, &edges, vec![0, 2, 9], 1, 3).unwrap();
        assert_eq!(level.open_moves(0, 0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(level.open_moves(0, 6).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(level.open_moves(1, 0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_from_spec_matches_build() {
        let spec = LevelSpec {
            node_count: 3,
            edges: triangle(),
            max_values: vec![0, 4, 6],
            carry_limit: 2,
            moves: 8,
        };
        assert_eq!(
            Level::from_spec(&spec).unwrap(),
            Level::build(3, &triangle(), vec![0, 4, 6], 2, 8).unwrap()
        );
    }

    #[test]
    fn test_new_random_with_seed_determinism() {
        let a = Level::new_random_with_seed(42, 6);
        let b = Level::new_random_with_seed(42, 6);
        let c = Level::new_random_with_seed(43, 6);
        assert_eq!(a, b);
        assert_ne!(a, c, "different seeds should usually produce different levels");
    }

    #[test]
    fn test_new_random_levels_are_connected_to_home() {
        for seed in 0..20 {
            let level = Level::new_random_with_seed(seed, 6);
            assert_eq!(level.max_values().iter().filter(|&&v| v == 0).count(), 1);

            let mut seen = vec![false; level.node_count()];
            let mut stack = vec![level.home()];
            seen[level.home()] = true;
            while let Some(n) = stack.pop() {
                for m in level.open_moves(n, 0) {
                    if !seen[m] {
                        seen[m] = true;
                        stack.push(m);
                    }
                }
            }
            assert!(seen.iter().all(|&s| s), "seed {seed} produced an unreachable node");
        }
    }

    #[test]
    fn test_display_uses_one_indexed_nodes() {
        let level = Level::build(2, &[EdgeSpec::undirected(0, 1)], vec![0, 5], 1, 4).unwrap();
        let text = level.to_string();
        assert!(text.contains("Home: 1"));
        assert!(text.contains("1 -> [2]"));
        assert!(text.contains("2 -> [1]"));
    }
}
