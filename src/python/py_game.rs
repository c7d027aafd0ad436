//! Game bindings for Python.

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::core::{BoardConfig, Move};
use crate::game::{Game, Turn};
use crate::nn::UniformPolicy;

use super::py_nn::{PyEncodedState, PyPolicy};

/// Python wrapper for one applied move.
#[pyclass(name = "Turn")]
#[derive(Clone)]
pub struct PyTurn(pub Turn);

#[pymethods]
impl PyTurn {
    /// Encoded board state before the move.
    #[getter]
    fn state(&self) -> PyEncodedState {
        PyEncodedState(self.0.state.clone())
    }

    /// Flat cell index of the move.
    #[getter]
    fn r#move(&self) -> usize {
        self.0.mv.index()
    }

    #[getter]
    fn hit(&self) -> bool {
        self.0.hit
    }

    #[getter]
    fn sunk(&self) -> bool {
        self.0.sunk
    }

    fn __repr__(&self) -> String {
        format!(
            "Turn(move={}, hit={}, sunk={})",
            self.0.mv.index(),
            self.0.hit,
            self.0.sunk
        )
    }
}

/// Python wrapper for Game.
///
/// One fleet on one board. Moves come from the caller, the hunting
/// heuristic, or a policy object.
#[pyclass(name = "Game")]
pub struct PyGame {
    inner: Game,
}

#[pymethods]
impl PyGame {
    /// Create a new game with a random layout.
    ///
    /// # Arguments
    /// - height, width: Board dimensions (default: 6x6)
    /// - ships: List of (symbol, length); default `[('@', 3), ('#', 2)]`
    /// - seed: RNG seed for layouts and move selection
    #[new]
    #[pyo3(signature = (height = 6, width = 6, ships = None, seed = 0))]
    fn new(
        height: usize,
        width: usize,
        ships: Option<Vec<(char, usize)>>,
        seed: u64,
    ) -> PyResult<Self> {
        let mut config = BoardConfig::new(height, width);
        if let Some(ships) = ships {
            config = config.with_ships(super::ship_specs(ships));
        }
        config.validate()?;
        Ok(Self {
            inner: Game::new(config, seed)?,
        })
    }

    /// Play one turn.
    ///
    /// With `move` set, fires at that cell index. Otherwise the hunting
    /// heuristic or `policy` picks; with no policy the choice is random.
    /// Returns None once the fleet is sunk.
    #[pyo3(signature = (policy = None, r#move = None))]
    fn take_move(&mut self, policy: Option<PyObject>, r#move: Option<usize>) -> PyResult<Option<PyTurn>> {
        let explicit = r#move.map(Move::new);
        let turn = match policy {
            Some(object) => self.inner.take_move(&PyPolicy::new(object), explicit)?,
            None => {
                let uniform = UniformPolicy::new(self.inner.board().size());
                self.inner.take_move(&uniform, explicit)?
            }
        };
        Ok(turn.map(PyTurn))
    }

    /// Observed grid, one list of symbols per row.
    ///
    /// `-` unknown, `X` miss, `O` hit, the ship symbol once sunk.
    fn observed(&self) -> Vec<Vec<char>> {
        let board = self.inner.board();
        (0..board.height())
            .map(|r| {
                (0..board.width())
                    .filter_map(|c| board.view(r, c).map(|v| v.symbol()))
                    .collect()
            })
            .collect()
    }

    /// Current encoded state.
    fn encode(&self) -> PyEncodedState {
        PyEncodedState(self.inner.board().encode())
    }

    /// 1.0 for unconsumed cells, 0.0 otherwise.
    fn available_mask<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_vec_bound(py, self.inner.board().available_mask())
    }

    /// Place a fresh random fleet.
    fn reset(&mut self) -> PyResult<()> {
        Ok(self.inner.reset()?)
    }

    #[getter]
    fn is_finished(&self) -> bool {
        self.inner.board().is_finished()
    }

    #[getter]
    fn height(&self) -> usize {
        self.inner.board().height()
    }

    #[getter]
    fn width(&self) -> usize {
        self.inner.board().width()
    }

    fn __str__(&self) -> String {
        self.inner.board().view_lines().join("\n")
    }

    fn __repr__(&self) -> String {
        let board = self.inner.board();
        let status = if board.is_finished() { "finished" } else { "ongoing" };
        format!(
            "Game({}x{}, remaining={}, status={})",
            board.height(),
            board.width(),
            board.available().remaining(),
            status
        )
    }
}
