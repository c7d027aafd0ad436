//! Policy and encoded-state bindings for Python.

use std::io;
use std::path::{Path, PathBuf};

use numpy::PyArray1;
use pyo3::prelude::*;
use tracing::warn;

use crate::core::{BoardConfig, Move, PolicyError};
use crate::nn::{EncodedState, EpsilonSchedule, Policy, SoftmaxPolicy};

/// Python wrapper for EncodedState.
#[pyclass(name = "EncodedState")]
#[derive(Clone, Debug)]
pub struct PyEncodedState(pub EncodedState);

#[pymethods]
impl PyEncodedState {
    /// Create a new encoded state from tensor data and shape.
    #[new]
    fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        Self(EncodedState::new(tensor, shape))
    }

    /// Get the tensor data as a list.
    #[getter]
    fn tensor(&self) -> Vec<f32> {
        self.0.tensor.clone()
    }

    /// Get the tensor shape `[planes, height, width]`.
    #[getter]
    fn shape(&self) -> Vec<usize> {
        self.0.shape.clone()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Convert tensor to numpy array (flat).
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_slice_bound(py, &self.0.tensor)
    }

    /// One plane as a flat list, or None past the end.
    fn plane(&self, index: usize) -> Option<Vec<f32>> {
        self.0.plane(index).map(<[f32]>::to_vec)
    }

    fn __repr__(&self) -> String {
        format!("EncodedState(shape={:?}, len={})", self.0.shape, self.0.len())
    }
}

/// Python-implemented policy.
///
/// Forwards every [`Policy`] call to methods of a Python object. Failures
/// in `predict` fall back to uniform probabilities; failures in `epsilon`
/// fall back to full exploration.
pub struct PyPolicy {
    object: PyObject,
}

impl PyPolicy {
    pub fn new(object: PyObject) -> Self {
        Self { object }
    }

    pub fn object(&self) -> &PyObject {
        &self.object
    }

    fn call_path(&self, method: &str, path: &Path) -> Result<(), PolicyError> {
        Python::with_gil(|py| {
            self.object
                .call_method1(py, method, (path.to_path_buf(),))
                .map(|_| ())
                .map_err(|e| PolicyError::Io(io::Error::other(e.to_string())))
        })
    }
}

impl Policy for PyPolicy {
    fn predict(&self, state: &EncodedState) -> Vec<f32> {
        Python::with_gil(|py| {
            let result = self
                .object
                .call_method1(py, "predict", (PyEncodedState(state.clone()),))
                .and_then(|r| r.extract::<Vec<f32>>(py));
            match result {
                Ok(probs) => probs,
                Err(e) => {
                    warn!(error = %e, "python predict() failed, using uniform");
                    let n = state.plane_size().max(1);
                    vec![1.0 / n as f32; n]
                }
            }
        })
    }

    fn train_step(&mut self, state: &EncodedState, action: Move, weight: f64) -> f64 {
        Python::with_gil(|py| {
            let result = self
                .object
                .call_method1(
                    py,
                    "train_step",
                    (PyEncodedState(state.clone()), action.index(), weight),
                )
                .and_then(|r| {
                    if r.is_none(py) {
                        Ok(0.0)
                    } else {
                        r.extract::<f64>(py)
                    }
                });
            result.unwrap_or_else(|e| {
                warn!(error = %e, "python train_step() failed");
                0.0
            })
        })
    }

    fn epsilon(&self) -> f64 {
        Python::with_gil(|py| {
            self.object
                .call_method0(py, "epsilon")
                .and_then(|r| r.extract::<f64>(py))
                .unwrap_or_else(|e| {
                    warn!(error = %e, "python epsilon() failed, exploring");
                    1.0
                })
        })
    }

    fn decay_epsilon(&mut self) {
        Python::with_gil(|py| {
            if let Err(e) = self.object.call_method0(py, "decay_epsilon") {
                warn!(error = %e, "python decay_epsilon() failed");
            }
        });
    }

    fn save(&self, path: &Path) -> Result<(), PolicyError> {
        self.call_path("save", path)
    }

    fn load(&mut self, path: &Path) -> Result<(), PolicyError> {
        self.call_path("load", path)
    }
}

// SAFETY: PyPolicy is Send + Sync because:
// 1. All Python interactions go through Python::with_gil()
// 2. PyObject reference counting is safe across threads under the GIL
//
// INVARIANT: Any new methods that access self.object MUST use with_gil().
unsafe impl Send for PyPolicy {}
unsafe impl Sync for PyPolicy {}

/// Python wrapper for the built-in linear softmax policy.
///
/// Exposes the same method names a Python policy must provide, so it can be
/// handed to `Game.take_move` or `Trainer` directly.
#[pyclass(name = "SoftmaxPolicy")]
#[derive(Clone)]
pub struct PySoftmaxPolicy(pub SoftmaxPolicy);

#[pymethods]
impl PySoftmaxPolicy {
    /// Create a zero-initialized policy sized for a board.
    ///
    /// # Arguments
    /// - height, width: Board dimensions (default: 6x6)
    /// - ships: List of (symbol, length); default `[('@', 3), ('#', 2)]`
    /// - learning_rate: SGD step size (default: 0.5)
    /// - epsilon, epsilon_min, epsilon_decay: Exploration schedule
    #[new]
    #[pyo3(signature = (
        height = 6,
        width = 6,
        ships = None,
        learning_rate = 0.5,
        epsilon = 1.0,
        epsilon_min = 0.01,
        epsilon_decay = 0.995
    ))]
    fn new(
        height: usize,
        width: usize,
        ships: Option<Vec<(char, usize)>>,
        learning_rate: f32,
        epsilon: f64,
        epsilon_min: f64,
        epsilon_decay: f64,
    ) -> PyResult<Self> {
        let mut config = BoardConfig::new(height, width);
        if let Some(ships) = ships {
            config = config.with_ships(super::ship_specs(ships));
        }
        config.validate()?;
        let schedule = EpsilonSchedule::default()
            .with_epsilon(epsilon)
            .with_min(epsilon_min)
            .with_decay(epsilon_decay);
        schedule.validate()?;
        Ok(Self(
            SoftmaxPolicy::for_board(&config)
                .with_learning_rate(learning_rate)
                .with_schedule(schedule),
        ))
    }

    fn predict(&self, state: &PyEncodedState) -> Vec<f32> {
        self.0.predict(&state.0)
    }

    fn train_step(&mut self, state: &PyEncodedState, action: usize, weight: f64) -> f64 {
        self.0.train_step(&state.0, Move::new(action), weight)
    }

    fn epsilon(&self) -> f64 {
        self.0.epsilon()
    }

    fn decay_epsilon(&mut self) {
        self.0.decay_epsilon();
    }

    fn save(&self, path: PathBuf) -> PyResult<()> {
        Ok(self.0.save(&path)?)
    }

    fn load(&mut self, path: PathBuf) -> PyResult<()> {
        Ok(self.0.load(&path)?)
    }

    fn __repr__(&self) -> String {
        format!("SoftmaxPolicy(epsilon={:.4})", self.0.epsilon())
    }
}
