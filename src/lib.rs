//! # battleship-rl
//!
//! A single-player Battleship engine built for self-play policy training.
//!
//! ## Design Principles
//!
//! 1. **Policy-Agnostic**: The engine never hardwires a model. Anything that
//!    implements [`Policy`] can pick moves and take weighted updates.
//!
//! 2. **Deterministic**: Every game owns a seeded ChaCha RNG. The same seed,
//!    config and policy reproduce the same layouts and moves.
//!
//! 3. **Explicit Failure**: Impossible placements, consumed or out-of-range
//!    moves, and bad configs are returned as errors, never silently fixed.
//!
//! ## Modules
//!
//! - `core`: Moves, placements, RNG, configuration, errors
//! - `game`: Board, hunting heuristic, turn controller
//! - `nn`: Encoded state, the `Policy` trait, baseline policies
//! - `training`: Reward shaping, episodes, the self-play trainer

pub mod core;
pub mod game;
pub mod nn;
pub mod training;

#[cfg(feature = "python")]
mod python;

// Re-export commonly used types
pub use crate::core::{
    BattleshipError, BoardConfig, ConfigError, GameRng, InvalidMoveReason, Move, Orientation,
    Placement, PolicyError, ShipCatalog, ShipSpec, TrainingError,
};

pub use crate::game::{
    AvailableMoves, Board, CellView, Direction, Game, HuntPhase, HuntingStrategy, MoveSource,
    Resolution, Turn,
};

pub use crate::nn::{
    load_or_default, EncodedState, EpsilonSchedule, Policy, SoftmaxPolicy, UniformPolicy,
};

pub use crate::training::{
    shape_rewards, Episode, EpisodeSummary, Trainer, TrainingConfig, TrainingHistory,
    TrainingReport,
};
