//! Linear softmax policy with an epsilon-greedy exploration schedule.
//!
//! This is the reference [`Policy`] used by the bundled training driver. It
//! maps the encoded state to one logit per cell with a single dense layer
//! and learns by reward-weighted cross-entropy SGD. External models plug in
//! through the same trait.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::traits::{EncodedState, Policy};
use crate::core::{ConfigError, Move, PolicyError};

/// Multiplicative epsilon decay with a floor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    /// Current exploration rate.
    pub epsilon: f64,

    /// Floor the rate never drops below.
    pub min: f64,

    /// Factor applied on each decay step.
    pub decay: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            min: 0.01,
            decay: 0.995,
        }
    }
}

impl EpsilonSchedule {
    /// Set the starting rate.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the floor.
    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }

    /// Set the decay factor.
    #[must_use]
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Apply one decay step, clamped at the floor.
    pub fn step(&mut self) {
        if self.epsilon > self.min {
            self.epsilon = (self.epsilon * self.decay).max(self.min);
        }
    }

    /// Check `0 <= min <= epsilon <= 1` and `0 < decay <= 1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.epsilon) || !(0.0..=self.epsilon).contains(&self.min) {
            return Err(ConfigError::Invalid(format!(
                "epsilon schedule requires 0 <= min <= epsilon <= 1, got min={} epsilon={}",
                self.min, self.epsilon
            )));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "epsilon decay must be in (0, 1], got {}",
                self.decay
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct SoftmaxParams {
    inputs: usize,
    outputs: usize,
    weights: Vec<f32>,
    bias: Vec<f32>,
    schedule: EpsilonSchedule,
}

/// Single dense layer followed by softmax over board cells.
#[derive(Clone, Debug)]
pub struct SoftmaxPolicy {
    inputs: usize,
    outputs: usize,
    /// Row-major `[outputs, inputs]`.
    weights: Vec<f32>,
    bias: Vec<f32>,
    learning_rate: f32,
    schedule: EpsilonSchedule,
}

impl SoftmaxPolicy {
    /// Create a zero-initialized policy (uniform predictions).
    ///
    /// `inputs` is the encoded state length, `outputs` the board size.
    pub fn new(inputs: usize, outputs: usize) -> Self {
        Self {
            inputs,
            outputs,
            weights: vec![0.0; inputs * outputs],
            bias: vec![0.0; outputs],
            learning_rate: 0.5,
            schedule: EpsilonSchedule::default(),
        }
    }

    /// Create a policy sized for a board configuration.
    pub fn for_board(config: &crate::core::BoardConfig) -> Self {
        Self::new(config.encoded_len(), config.board_size())
    }

    /// Set the SGD step size. The per-step reward weight multiplies this.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the exploration schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: EpsilonSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Current exploration schedule.
    #[must_use]
    pub fn schedule(&self) -> &EpsilonSchedule {
        &self.schedule
    }

    fn logits(&self, state: &EncodedState) -> Vec<f32> {
        if self.inputs == 0 {
            return self.bias.clone();
        }
        let n = self.inputs.min(state.tensor.len());
        let x = &state.tensor[..n];
        self.weights
            .chunks_exact(self.inputs)
            .zip(&self.bias)
            .map(|(row, b)| b + row[..n].iter().zip(x).map(|(w, v)| w * v).sum::<f32>())
            .collect()
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

impl Policy for SoftmaxPolicy {
    fn predict(&self, state: &EncodedState) -> Vec<f32> {
        if self.outputs == 0 {
            return vec![];
        }
        softmax(&self.logits(state))
    }

    fn train_step(&mut self, state: &EncodedState, action: Move, weight: f64) -> f64 {
        let target = action.index();
        if target >= self.outputs {
            return 0.0;
        }
        let probs = self.predict(state);
        let loss = -(f64::from(probs[target]).max(1e-12)).ln();

        // d(-w * ln p_a)/d logit_k = w * (p_k - [k == a])
        let scale = self.learning_rate * weight as f32;
        let n = self.inputs.min(state.tensor.len());
        let x = &state.tensor[..n];
        for (k, p) in probs.iter().enumerate() {
            let indicator = if k == target { 1.0 } else { 0.0 };
            let grad = scale * (p - indicator);
            if grad == 0.0 {
                continue;
            }
            self.bias[k] -= grad;
            let row = &mut self.weights[k * self.inputs..k * self.inputs + n];
            for (w, v) in row.iter_mut().zip(x) {
                *w -= grad * v;
            }
        }
        loss
    }

    fn epsilon(&self) -> f64 {
        self.schedule.epsilon
    }

    fn decay_epsilon(&mut self) {
        self.schedule.step();
    }

    fn save(&self, path: &Path) -> Result<(), PolicyError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let params = SoftmaxParams {
            inputs: self.inputs,
            outputs: self.outputs,
            weights: self.weights.clone(),
            bias: self.bias.clone(),
            schedule: self.schedule,
        };
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &params)?;
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<(), PolicyError> {
        let reader = BufReader::new(File::open(path)?);
        let params: SoftmaxParams = bincode::deserialize_from(reader)?;

        let expected = self.inputs * self.outputs;
        if params.inputs != self.inputs
            || params.outputs != self.outputs
            || params.weights.len() != expected
            || params.bias.len() != self.outputs
        {
            return Err(PolicyError::ShapeMismatch {
                expected,
                found: params.weights.len(),
            });
        }
        params.schedule.validate()?;

        self.weights = params.weights;
        self.bias = params.bias;
        self.schedule = params.schedule;
        Ok(())
    }
}
