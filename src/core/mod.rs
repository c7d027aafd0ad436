//! Core engine types: moves, placements, RNG, configuration, errors.
//!
//! These are the building blocks shared by the board, the policy interface
//! and the training loop.

pub mod action;
pub mod config;
pub mod error;
pub mod rng;

pub use action::{Move, Orientation, Placement};
pub use config::{BoardConfig, ShipCatalog, ShipSpec, RESERVED_SYMBOLS};
pub use error::{BattleshipError, ConfigError, InvalidMoveReason, PolicyError, TrainingError};
pub use rng::GameRng;
