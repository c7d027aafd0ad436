//! Training bindings for Python.

use std::path::PathBuf;

use numpy::{PyArray1, PyArray2};
use pyo3::exceptions::PyIOError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::BoardConfig;
use crate::training::{self, Episode, EpisodeSummary, Trainer, TrainingConfig};

use super::py_nn::{PyEncodedState, PyPolicy};

/// Python wrapper for TrainingConfig.
#[pyclass(name = "TrainingConfig")]
#[derive(Clone)]
pub struct PyTrainingConfig(pub TrainingConfig);

#[pymethods]
impl PyTrainingConfig {
    /// Create a new training configuration.
    ///
    /// # Arguments
    /// - episodes: Number of self-play episodes (default: 3000)
    /// - gamma: Reward discount in (0, 1) (default: 0.5)
    /// - alpha: Reward-to-weight scale (default: 0.01)
    /// - log_interval: Episodes per progress log (default: 50)
    /// - save_every_logs: Log intervals per policy save (default: 20)
    /// - max_moves: Per-episode move cap (default: board size)
    /// - seed: RNG seed (default: 0)
    /// - model_path: Policy save path (default: no saves)
    /// - height, width, ships: Board shape and fleet
    #[new]
    #[pyo3(signature = (
        episodes = 3000,
        gamma = 0.5,
        alpha = 0.01,
        log_interval = 50,
        save_every_logs = 20,
        max_moves = None,
        seed = 0,
        model_path = None,
        height = 6,
        width = 6,
        ships = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        episodes: usize,
        gamma: f64,
        alpha: f64,
        log_interval: usize,
        save_every_logs: usize,
        max_moves: Option<usize>,
        seed: u64,
        model_path: Option<PathBuf>,
        height: usize,
        width: usize,
        ships: Option<Vec<(char, usize)>>,
    ) -> PyResult<Self> {
        let mut board = BoardConfig::new(height, width);
        if let Some(ships) = ships {
            board = board.with_ships(super::ship_specs(ships));
        }
        let mut config = TrainingConfig::new()
            .with_board(board)
            .with_episodes(episodes)
            .with_gamma(gamma)
            .with_alpha(alpha)
            .with_log_interval(log_interval)
            .with_save_every_logs(save_every_logs)
            .with_seed(seed);
        config.max_moves = max_moves;
        config.model_path = model_path;
        config.validate()?;
        Ok(Self(config))
    }

    /// Load a configuration from a JSON file.
    #[staticmethod]
    fn from_json(path: PathBuf) -> PyResult<Self> {
        Ok(Self(TrainingConfig::from_json_file(path)?))
    }

    #[getter]
    fn episodes(&self) -> usize {
        self.0.episodes
    }

    #[getter]
    fn gamma(&self) -> f64 {
        self.0.gamma
    }

    #[getter]
    fn alpha(&self) -> f64 {
        self.0.alpha
    }

    #[getter]
    fn log_interval(&self) -> usize {
        self.0.log_interval
    }

    #[getter]
    fn seed(&self) -> u64 {
        self.0.seed
    }

    fn __repr__(&self) -> String {
        format!(
            "TrainingConfig(episodes={}, gamma={}, alpha={}, board={}x{})",
            self.0.episodes, self.0.gamma, self.0.alpha, self.0.board.height, self.0.board.width
        )
    }
}

/// Python wrapper for a played episode.
#[pyclass(name = "Episode")]
#[derive(Clone)]
pub struct PyEpisode(pub Episode);

#[pymethods]
impl PyEpisode {
    /// Encoded states before each move.
    #[getter]
    fn states(&self) -> Vec<PyEncodedState> {
        self.0
            .steps
            .iter()
            .map(|s| PyEncodedState(s.state.clone()))
            .collect()
    }

    /// Cell index of each move.
    #[getter]
    fn moves(&self) -> Vec<usize> {
        self.0.steps.iter().map(|s| s.mv.index()).collect()
    }

    #[getter]
    fn hits(&self) -> Vec<bool> {
        self.0.hits()
    }

    #[getter]
    fn rewards(&self) -> Vec<f64> {
        self.0.rewards.clone()
    }

    #[getter]
    fn finished(&self) -> bool {
        self.0.finished
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Stack states, moves and rewards as numpy arrays.
    ///
    /// Returns (states [N, state_dim] float32, moves [N] int64,
    /// rewards [N] float64).
    #[allow(clippy::type_complexity)]
    fn to_numpy<'py>(
        &self,
        py: Python<'py>,
    ) -> PyResult<(
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray1<i64>>,
        Bound<'py, PyArray1<f64>>,
    )> {
        let rows: Vec<Vec<f32>> = self.0.steps.iter().map(|s| s.state.tensor.clone()).collect();
        let states = PyArray2::from_vec2_bound(py, &rows)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        let moves: Vec<i64> = self.0.steps.iter().map(|s| s.mv.index() as i64).collect();
        Ok((
            states,
            PyArray1::from_vec_bound(py, moves),
            PyArray1::from_slice_bound(py, &self.0.rewards),
        ))
    }

    fn __repr__(&self) -> String {
        format!(
            "Episode(moves={}, hits={}, finished={})",
            self.0.len(),
            self.0.hit_count(),
            self.0.finished
        )
    }
}

fn summary_dict<'py>(py: Python<'py>, summary: &EpisodeSummary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("episode", summary.episode)?;
    dict.set_item("moves", summary.moves)?;
    dict.set_item("hits", summary.hits)?;
    dict.set_item("won", summary.won)?;
    dict.set_item("total_reward", summary.total_reward)?;
    dict.set_item("loss", summary.loss)?;
    dict.set_item("epsilon", summary.epsilon)?;
    Ok(dict)
}

/// Self-play trainer driving a Python policy object.
#[pyclass(name = "Trainer")]
pub struct PyTrainer {
    inner: Trainer<PyPolicy>,
}

#[pymethods]
impl PyTrainer {
    /// Create a trainer around `policy`.
    ///
    /// `policy` must provide predict/train_step/epsilon/decay_epsilon/
    /// save/load. `config` defaults to `TrainingConfig()`.
    #[new]
    #[pyo3(signature = (policy, config = None))]
    fn new(policy: PyObject, config: Option<PyTrainingConfig>) -> PyResult<Self> {
        let config = config.map(|c| c.0).unwrap_or_default();
        Ok(Self {
            inner: Trainer::new(config, PyPolicy::new(policy))?,
        })
    }

    /// The wrapped policy object.
    #[getter]
    fn policy(&self, py: Python<'_>) -> PyObject {
        self.inner.policy().object().clone_ref(py)
    }

    /// Play one episode without training.
    fn run_episode(&mut self) -> PyResult<PyEpisode> {
        Ok(PyEpisode(self.inner.run_episode()?))
    }

    /// Play, train, and decay exploration for one episode.
    fn train_episode<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let summary = self.inner.train_episode()?;
        summary_dict(py, &summary)
    }

    /// Run the configured number of episodes.
    fn train<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let report = self.inner.train()?;
        let dict = PyDict::new_bound(py);
        dict.set_item("episodes", report.episodes)?;
        dict.set_item("wins", report.wins)?;
        dict.set_item("total_moves", report.total_moves)?;
        dict.set_item("average_moves", report.average_moves())?;
        dict.set_item("final_epsilon", report.final_epsilon)?;
        dict.set_item("saves", report.saves)?;
        Ok(dict)
    }

    /// Per-episode series: total_rewards, cumulative_wins, cumulative_moves.
    fn history<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let history = self.inner.history();
        let dict = PyDict::new_bound(py);
        dict.set_item("total_rewards", history.total_rewards.clone())?;
        dict.set_item("cumulative_wins", history.cumulative_wins.clone())?;
        dict.set_item("cumulative_moves", history.cumulative_moves.clone())?;
        Ok(dict)
    }

    /// Write the history as JSON.
    fn write_history(&self, path: PathBuf) -> PyResult<()> {
        self.inner
            .history()
            .write_json(&path)
            .map_err(|e| PyIOError::new_err(e.to_string()))
    }

    #[getter]
    fn episodes_run(&self) -> usize {
        self.inner.episodes_run()
    }

    fn __repr__(&self) -> String {
        format!("Trainer(episodes_run={})", self.inner.episodes_run())
    }
}

/// Shaped per-step rewards for a hit log.
#[pyfunction]
#[pyo3(signature = (hits, total_ship_cells, board_size, gamma = 0.5))]
pub fn shape_rewards(
    hits: Vec<bool>,
    total_ship_cells: usize,
    board_size: usize,
    gamma: f64,
) -> Vec<f64> {
    training::shape_rewards(&hits, total_ship_cells, board_size, gamma)
}
