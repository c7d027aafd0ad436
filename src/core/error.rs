//! Error types for board construction, move resolution, configuration
//! and policy persistence.

use std::io;

use thiserror::Error;

/// Why a move was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidMoveReason {
    /// Index is not a cell of this board.
    OutOfBounds,
    /// Cell was already bombed.
    AlreadyConsumed,
}

impl std::fmt::Display for InvalidMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMoveReason::OutOfBounds => write!(f, "out of bounds"),
            InvalidMoveReason::AlreadyConsumed => write!(f, "already consumed"),
        }
    }
}

/// Errors raised by the game engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleshipError {
    /// No feasible placement exists for a ship.
    #[error("no valid placement for ship '{symbol}' (length {length})")]
    Placement { symbol: char, length: usize },

    /// Caller supplied a move that cannot be resolved.
    #[error("invalid move {index}: {reason}")]
    InvalidMove {
        index: usize,
        reason: InvalidMoveReason,
    },

    /// An explicit layout is out of bounds, overlapping, or mismatched with
    /// the catalog.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

/// Configuration validation and loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Policy persistence errors.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("encode/decode error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("shape mismatch: expected {expected} parameters, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("invalid saved epsilon schedule: {0}")]
    Schedule(#[from] ConfigError),
}

/// Errors that abort a training run.
#[derive(Error, Debug)]
pub enum TrainingError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] BattleshipError),
}
