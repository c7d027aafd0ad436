//! Episode records and per-run training history.
//!
//! An episode captures one self-play match:
//! - Encoded states before each move
//! - Moves taken and whether they hit
//! - Shaped rewards, filled in once the match is over

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Move;
use crate::game::Turn;
use crate::nn::EncodedState;

/// A single move in an episode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    /// Encoded board state before the move.
    pub state: EncodedState,

    /// The move taken.
    pub mv: Move,

    /// Whether the move hit a ship.
    pub hit: bool,

    /// Move number in the episode (0-indexed).
    pub move_number: usize,
}

impl Step {
    /// Create a step from a played turn.
    pub fn from_turn(turn: Turn, move_number: usize) -> Self {
        Self {
            state: turn.state,
            mv: turn.mv,
            hit: turn.hit,
            move_number,
        }
    }
}

/// A complete self-play episode.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Episode {
    /// All moves in order.
    pub steps: Vec<Step>,

    /// Shaped reward per step. Empty until [`Episode::set_rewards`].
    pub rewards: Vec<f64>,

    /// Whether every ship was sunk.
    pub finished: bool,
}

impl Episode {
    /// Create an empty episode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no moves were made.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Hit flags in move order.
    pub fn hits(&self) -> Vec<bool> {
        self.steps.iter().map(|s| s.hit).collect()
    }

    /// Number of hits.
    pub fn hit_count(&self) -> usize {
        self.steps.iter().filter(|s| s.hit).count()
    }

    /// Attach shaped rewards, one per step.
    pub fn set_rewards(&mut self, rewards: Vec<f64>) {
        debug_assert_eq!(rewards.len(), self.steps.len());
        self.rewards = rewards;
    }

    /// Sum of shaped rewards.
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }

    /// Pair each step with its training weight `alpha * reward`.
    pub fn to_training_samples(&self, alpha: f64) -> Vec<TrainingSample> {
        self.steps
            .iter()
            .zip(&self.rewards)
            .map(|(step, reward)| TrainingSample {
                state: step.state.clone(),
                action: step.mv,
                weight: alpha * reward,
            })
            .collect()
    }
}

/// A (state, move, weight) triple for one supervised policy update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingSample {
    pub state: EncodedState,
    pub action: Move,
    pub weight: f64,
}

/// Outcome of one training episode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode index (0-based).
    pub episode: usize,
    pub moves: usize,
    pub hits: usize,
    pub won: bool,
    pub total_reward: f64,
    /// Summed training loss over the episode.
    pub loss: f64,
    /// Exploration rate after this episode's decay.
    pub epsilon: f64,
}

/// Per-episode series for plotting training curves.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub total_rewards: Vec<f64>,
    pub cumulative_wins: Vec<usize>,
    pub cumulative_moves: Vec<usize>,
}

impl TrainingHistory {
    /// Append one episode's summary.
    pub fn record(&mut self, summary: &EpisodeSummary) {
        let wins = self.cumulative_wins.last().copied().unwrap_or(0) + usize::from(summary.won);
        let moves = self.cumulative_moves.last().copied().unwrap_or(0) + summary.moves;
        self.total_rewards.push(summary.total_reward);
        self.cumulative_wins.push(wins);
        self.cumulative_moves.push(moves);
    }

    /// Number of recorded episodes.
    pub fn len(&self) -> usize {
        self.total_rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_rewards.is_empty()
    }

    /// Write the history as pretty JSON.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self).map_err(std::io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_step(index: usize, hit: bool) -> Step {
        Step {
            state: EncodedState::zeros(vec![2, 2, 2]),
            mv: Move::new(index),
            hit,
            move_number: index,
        }
    }

    fn summary(episode: usize, moves: usize, won: bool) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            moves,
            hits: 2,
            won,
            total_reward: 0.5,
            loss: 1.0,
            epsilon: 0.9,
        }
    }

    #[test]
    fn test_episode_hits() {
        let mut ep = Episode::new();
        assert!(ep.is_empty());
        ep.push(make_step(0, false));
        ep.push(make_step(1, true));
        ep.push(make_step(2, true));

        assert_eq!(ep.len(), 3);
        assert_eq!(ep.hits(), vec![false, true, true]);
        assert_eq!(ep.hit_count(), 2);
    }

    #[test]
    fn test_training_samples_scale_by_alpha() {
        let mut ep = Episode::new();
        ep.push(make_step(0, false));
        ep.push(make_step(3, true));
        ep.set_rewards(vec![-0.5, 2.0]);

        let samples = ep.to_training_samples(0.01);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].action, Move::new(3));
        assert!((samples[0].weight + 0.005).abs() < 1e-12);
        assert!((samples[1].weight - 0.02).abs() < 1e-12);
        assert!((ep.total_reward() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_history_is_cumulative() {
        let mut history = TrainingHistory::default();
        history.record(&summary(0, 10, true));
        history.record(&summary(1, 12, false));
        history.record(&summary(2, 8, true));

        assert_eq!(history.len(), 3);
        assert_eq!(history.cumulative_wins, vec![1, 1, 2]);
        assert_eq!(history.cumulative_moves, vec![10, 22, 30]);
    }

    #[test]
    fn test_history_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = TrainingHistory::default();
        history.record(&summary(0, 10, true));
        history.write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let restored: TrainingHistory = serde_json::from_str(&text).unwrap();
        assert_eq!(restored.cumulative_moves, vec![10]);
    }

    #[test]
    fn test_episode_serialization() {
        let mut ep = Episode::new();
        ep.push(make_step(1, true));
        ep.set_rewards(vec![0.25]);
        ep.finished = true;

        let json = serde_json::to_string(&ep).unwrap();
        let restored: Episode = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert!(restored.finished);
        assert_eq!(restored.rewards, vec![0.25]);
    }
}
