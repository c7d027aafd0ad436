//! Policy interface and the encoded-state tensor it consumes.
//!
//! The engine never hardwires a model. Anything that can map an encoded
//! board to move probabilities, take weighted supervised updates, and expose
//! an exploration rate can drive a [`Game`](crate::game::Game).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{Move, PolicyError};

/// Encoded board state as a flat tensor for policy input.
///
/// Layout is `[ships + 1, height, width]` flattened row-major: the first
/// plane is the per-cell signal (0 unresolved, +1 hit, -1 miss); each
/// following plane is constant 1.0 while the matching catalog ship is
/// afloat and 0.0 once sunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor: `[planes, height, width]`.
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Create a zero-filled encoded state with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    /// Check if the tensor is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }

    /// Number of cells in one plane.
    #[must_use]
    pub fn plane_size(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// The `index`-th plane, or `None` past the end.
    #[must_use]
    pub fn plane(&self, index: usize) -> Option<&[f32]> {
        let size = self.plane_size();
        let start = index.checked_mul(size)?;
        self.tensor.get(start..start + size)
    }
}

/// A move-selection policy trained from shaped rewards.
///
/// Implementations own their exploration rate. The training loop calls
/// [`Policy::decay_epsilon`] once per episode; nothing else mutates it.
pub trait Policy: Send {
    /// Predict move probabilities for the given state.
    ///
    /// Returns one entry per board cell (row-major). Entries for already
    /// consumed cells are ignored by the caller.
    fn predict(&self, state: &EncodedState) -> Vec<f32>;

    /// One weighted supervised update toward `action`.
    ///
    /// `weight` is the shaped reward scaled by the learning-rate factor;
    /// negative weights push probability away from `action`. Returns the
    /// cross-entropy loss before the update.
    fn train_step(&mut self, state: &EncodedState, action: Move, weight: f64) -> f64;

    /// Current exploration rate in `[0, 1]`.
    fn epsilon(&self) -> f64;

    /// Decay the exploration rate toward its floor. Never increases it.
    fn decay_epsilon(&mut self);

    /// Persist the policy.
    fn save(&self, path: &Path) -> Result<(), PolicyError>;

    /// Restore the policy. On error the policy must be left unchanged.
    fn load(&mut self, path: &Path) -> Result<(), PolicyError>;
}

/// Load `path` into `policy`, keeping the fresh policy on failure.
///
/// Returns `true` if the saved policy was restored.
pub fn load_or_default<P: Policy + ?Sized>(policy: &mut P, path: &Path) -> bool {
    match policy.load(path) {
        Ok(()) => {
            info!(path = %path.display(), "policy loaded");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no usable policy found, starting fresh");
            false
        }
    }
}

/// Uniform random policy (baseline for testing and for untrained play).
///
/// Epsilon is pinned at 1.0, so move selection is always uniformly random
/// among available cells.
#[derive(Clone, Debug, Default)]
pub struct UniformPolicy {
    action_space_size: usize,
}

impl UniformPolicy {
    /// Create a new uniform policy over `action_space_size` cells.
    pub fn new(action_space_size: usize) -> Self {
        Self { action_space_size }
    }
}

impl Policy for UniformPolicy {
    fn predict(&self, _state: &EncodedState) -> Vec<f32> {
        if self.action_space_size == 0 {
            return vec![];
        }
        let prob = 1.0 / self.action_space_size as f32;
        vec![prob; self.action_space_size]
    }

    fn train_step(&mut self, _state: &EncodedState, _action: Move, _weight: f64) -> f64 {
        if self.action_space_size == 0 {
            return 0.0;
        }
        (self.action_space_size as f64).ln()
    }

    fn epsilon(&self) -> f64 {
        1.0
    }

    fn decay_epsilon(&mut self) {}

    fn save(&self, _path: &Path) -> Result<(), PolicyError> {
        Ok(())
    }

    fn load(&mut self, _path: &Path) -> Result<(), PolicyError> {
        Ok(())
    }
}
