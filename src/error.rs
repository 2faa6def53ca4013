//! Error types for level construction, level parsing, live play and parameter sweeps.

use crate::level::NodeId;
use thiserror::Error;

/// Raised while building a [`crate::level::Level`] from raw geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("edge references node {node} but the level only has {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    #[error("expected {expected} max values (one per node), found {found}")]
    ValueCountMismatch { expected: usize, found: usize },

    #[error("level has no home node (a node with max value 0)")]
    MissingHome,

    #[error("level has {} home nodes, expected exactly one: {homes:?}", .homes.len())]
    MultipleHomes { homes: Vec<NodeId> },

    #[error("carry limit must be at least 1")]
    NoCarrySlots,

    #[error("conditional on edge {from}-{to} requires a score below 0 and can never open")]
    UnsatisfiableConditional { from: NodeId, to: NodeId },
}

/// Raised while reading levels out of their textual notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed edge '{token}': {message}")]
    MalformedEdge { token: String, message: String },

    #[error("invalid integer '{text}' in {field}")]
    InvalidNumber { text: String, field: &'static str },

    #[error("node numbers are 1-indexed, found 0 in edge '{token}'")]
    ZeroNode { token: String },

    #[error("invalid level spec: {message}")]
    InvalidSpec { message: String },

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Raised by [`crate::engine::Game`] when a move or plan cannot be executed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no open edge from node {from} to node {to} at score {score}")]
    IllegalMove { from: NodeId, to: NodeId, score: u32 },

    #[error("move budget of {moves} already spent")]
    OutOfMoves { moves: usize },

    #[error("plan has {found} moves but the level allows {expected}")]
    PlanLength { expected: usize, found: usize },
}

/// Raised when a parameter sweep is configured with an unusable grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("sweep grid is empty: provide at least one discount and one lookahead")]
    EmptyGrid,

    #[error("discount {0} is outside [0, 1)")]
    InvalidDiscount(f32),
}
