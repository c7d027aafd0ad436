//! Python bindings for the battleship-rl engine.
//!
//! # Quick Start
//!
//! ```python
//! import battleship_rl as bs
//!
//! # Built-in linear policy, or any object with the same methods
//! policy = bs.SoftmaxPolicy(height=6, width=6)
//!
//! config = bs.TrainingConfig(episodes=500, gamma=0.5, alpha=0.01)
//! trainer = bs.Trainer(policy, config)
//! report = trainer.train()
//!
//! history = trainer.history()
//! ```
//!
//! A Python policy object must provide `predict(state)`,
//! `train_step(state, move, weight)`, `epsilon()`, `decay_epsilon()`,
//! `save(path)` and `load(path)`.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::core::{BattleshipError, ConfigError, PolicyError, ShipSpec, TrainingError};

mod py_game;
mod py_nn;
mod py_training;

pub use py_game::*;
pub use py_nn::*;
pub use py_training::*;

impl From<BattleshipError> for PyErr {
    fn from(err: BattleshipError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

impl From<ConfigError> for PyErr {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => PyIOError::new_err(e.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

impl From<PolicyError> for PyErr {
    fn from(err: PolicyError) -> Self {
        PyIOError::new_err(err.to_string())
    }
}

impl From<TrainingError> for PyErr {
    fn from(err: TrainingError) -> Self {
        match err {
            TrainingError::Config(e) => e.into(),
            TrainingError::Game(e) => e.into(),
        }
    }
}

/// Convert `[(symbol, length), ...]` into ship specs.
fn ship_specs(ships: Vec<(char, usize)>) -> Vec<ShipSpec> {
    ships
        .into_iter()
        .map(|(symbol, length)| ShipSpec::new(symbol, length))
        .collect()
}

/// battleship_rl: Battleship self-play for policy training.
///
/// This module provides:
/// - Games with a hunting heuristic and epsilon-greedy move selection
/// - Encoded board states for model input
/// - Reward shaping and a self-play trainer driving Python policies
#[pymodule]
fn battleship_rl(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Policy types
    m.add_class::<PyEncodedState>()?;
    m.add_class::<PySoftmaxPolicy>()?;

    // Games
    m.add_class::<PyGame>()?;
    m.add_class::<PyTurn>()?;

    // Training
    m.add_class::<PyTrainingConfig>()?;
    m.add_class::<PyEpisode>()?;
    m.add_class::<PyTrainer>()?;
    m.add_function(wrap_pyfunction!(shape_rewards, m)?)?;

    Ok(())
}
