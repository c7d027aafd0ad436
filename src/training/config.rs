//! Training run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{BoardConfig, ConfigError};

/// Configuration for a self-play training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Board dimensions and ships.
    pub board: BoardConfig,

    /// Number of self-play episodes.
    pub episodes: usize,

    /// Reward discount factor, in (0, 1).
    pub gamma: f64,

    /// Scale applied to shaped rewards to form training weights.
    pub alpha: f64,

    /// Log aggregate statistics every this many episodes.
    pub log_interval: usize,

    /// Save the policy every `log_interval * save_every_logs` episodes.
    pub save_every_logs: usize,

    /// Truncate an episode after this many moves. `None` = board size.
    pub max_moves: Option<usize>,

    /// Seed for board layouts and move selection.
    pub seed: u64,

    /// Where the policy is loaded from and saved to. `None` disables both.
    pub model_path: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            episodes: 3000,
            gamma: 0.5,
            alpha: 0.01,
            log_interval: 50,
            save_every_logs: 20,
            max_moves: None,
            seed: 0,
            model_path: None,
        }
    }
}

impl TrainingConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board configuration.
    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    /// Set the number of episodes.
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    /// Set the discount factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the reward scale.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the logging cadence.
    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval;
        self
    }

    /// Set how many log intervals pass between saves.
    pub fn with_save_every_logs(mut self, logs: usize) -> Self {
        self.save_every_logs = logs;
        self
    }

    /// Set the per-episode move cap.
    pub fn with_max_moves(mut self, max: usize) -> Self {
        self.max_moves = Some(max);
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the model path.
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Episodes between policy saves.
    pub fn save_interval(&self) -> usize {
        self.log_interval.saturating_mul(self.save_every_logs)
    }

    /// Effective move cap.
    pub fn effective_max_moves(&self) -> usize {
        self.max_moves.unwrap_or_else(|| self.board.board_size())
    }

    /// Check all fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "gamma must be in (0, 1), got {}",
                self.gamma
            )));
        }
        if !self.alpha.is_finite() {
            return Err(ConfigError::Invalid(format!("alpha must be finite, got {}", self.alpha)));
        }
        if self.log_interval == 0 || self.save_every_logs == 0 {
            return Err(ConfigError::Invalid(
                "log_interval and save_every_logs must be non-zero".into(),
            ));
        }
        if self.log_interval.checked_mul(self.save_every_logs).is_none() {
            return Err(ConfigError::Invalid(format!(
                "log_interval * save_every_logs overflows ({} * {})",
                self.log_interval, self.save_every_logs
            )));
        }
        if self.max_moves == Some(0) {
            return Err(ConfigError::Invalid("max_moves must be non-zero".into()));
        }
        Ok(())
    }

    /// Load and validate a config from a JSON file. Missing fields take
    /// their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}
