//! Self-play training loop.
//!
//! Each episode places a fresh random fleet, lets the policy shoot until
//! the fleet is sunk (or the move cap is hit), shapes the rewards, and
//! feeds one weighted update per move back into the policy.

use tracing::{debug, info, warn};

use crate::core::TrainingError;
use crate::game::Game;
use crate::nn::Policy;

use super::config::TrainingConfig;
use super::episode::{Episode, EpisodeSummary, Step, TrainingHistory};
use super::reward::shape_rewards;

/// Aggregate statistics for a finished run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingReport {
    pub episodes: usize,
    pub wins: usize,
    pub total_moves: usize,
    pub final_epsilon: f64,
    /// Number of successful policy saves.
    pub saves: usize,
}

impl TrainingReport {
    /// Mean moves per episode.
    pub fn average_moves(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.episodes as f64
        }
    }
}

/// Statistics over the current logging window.
#[derive(Default)]
struct Window {
    episodes: usize,
    moves: usize,
    wins: usize,
}

impl Window {
    fn record(&mut self, summary: &EpisodeSummary) {
        self.episodes += 1;
        self.moves += summary.moves;
        self.wins += usize::from(summary.won);
    }
}

/// Drives self-play episodes and trains the policy it owns.
pub struct Trainer<P: Policy> {
    config: TrainingConfig,
    game: Game,
    policy: P,
    history: TrainingHistory,
    episodes_run: usize,
}

impl<P: Policy> Trainer<P> {
    /// Create a trainer. Fails if the config is invalid or the fleet
    /// cannot be placed.
    pub fn new(config: TrainingConfig, policy: P) -> Result<Self, TrainingError> {
        config.validate()?;
        let game = Game::new(config.board.clone(), config.seed)?;
        Ok(Self {
            config,
            game,
            policy,
            history: TrainingHistory::default(),
            episodes_run: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Consume the trainer, returning the trained policy.
    pub fn into_policy(self) -> P {
        self.policy
    }

    #[must_use]
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Episodes trained so far.
    #[must_use]
    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// Play one episode on a fresh board without training.
    ///
    /// The returned episode carries shaped rewards.
    pub fn run_episode(&mut self) -> Result<Episode, TrainingError> {
        self.game.reset()?;
        let max_moves = self.config.effective_max_moves();

        let mut episode = Episode::new();
        for move_number in 0..max_moves {
            match self.game.take_move(&self.policy, None)? {
                Some(turn) => episode.push(Step::from_turn(turn, move_number)),
                None => break,
            }
        }

        let board = self.game.board();
        episode.finished = board.is_finished();
        let rewards = shape_rewards(
            &episode.hits(),
            board.total_ship_cells(),
            board.size(),
            self.config.gamma,
        );
        episode.set_rewards(rewards);
        Ok(episode)
    }

    /// Apply one weighted update per step. Returns the summed loss.
    pub fn train_on_episode(&mut self, episode: &Episode) -> f64 {
        episode
            .to_training_samples(self.config.alpha)
            .iter()
            .map(|s| self.policy.train_step(&s.state, s.action, s.weight))
            .sum()
    }

    /// Play, train, and decay exploration for a single episode.
    pub fn train_episode(&mut self) -> Result<EpisodeSummary, TrainingError> {
        let episode = self.run_episode()?;
        let loss = self.train_on_episode(&episode);
        self.policy.decay_epsilon();

        let summary = EpisodeSummary {
            episode: self.episodes_run,
            moves: episode.len(),
            hits: episode.hit_count(),
            won: episode.finished,
            total_reward: episode.total_reward(),
            loss,
            epsilon: self.policy.epsilon(),
        };
        self.history.record(&summary);
        self.episodes_run += 1;
        debug!(
            episode = summary.episode,
            moves = summary.moves,
            won = summary.won,
            loss = summary.loss,
            "episode trained"
        );
        Ok(summary)
    }

    /// Run the configured number of episodes.
    ///
    /// Logs window statistics every `log_interval` episodes and saves the
    /// policy every `log_interval * save_every_logs` episodes, plus once at
    /// the end unless the last episode already saved. Save failures are
    /// logged and do not stop training.
    pub fn train(&mut self) -> Result<TrainingReport, TrainingError> {
        let log_interval = self.config.log_interval;
        let save_interval = self.config.save_interval();
        let mut window = Window::default();
        let mut report = TrainingReport {
            episodes: 0,
            wins: 0,
            total_moves: 0,
            final_epsilon: self.policy.epsilon(),
            saves: 0,
        };
        let mut saved_last = false;

        info!(
            episodes = self.config.episodes,
            gamma = self.config.gamma,
            alpha = self.config.alpha,
            "training started"
        );

        for i in 0..self.config.episodes {
            let summary = self.train_episode()?;
            window.record(&summary);
            report.episodes += 1;
            report.total_moves += summary.moves;
            report.wins += usize::from(summary.won);

            if (i + 1) % log_interval == 0 {
                info!(
                    episode = i + 1,
                    epsilon = summary.epsilon,
                    avg_moves = window.moves as f64 / window.episodes as f64,
                    win_rate = window.wins as f64 / window.episodes as f64,
                    total_reward = summary.total_reward,
                    "training progress"
                );
                window = Window::default();
            }

            saved_last = (i + 1) % save_interval == 0;
            if saved_last && self.save_policy() {
                report.saves += 1;
            }
        }

        if !saved_last && self.save_policy() {
            report.saves += 1;
        }
        report.final_epsilon = self.policy.epsilon();
        info!(
            episodes = report.episodes,
            wins = report.wins,
            avg_moves = report.average_moves(),
            "training finished"
        );
        Ok(report)
    }

    /// Save to the configured model path. Returns whether a save happened.
    fn save_policy(&self) -> bool {
        let Some(path) = &self.config.model_path else {
            return false;
        };
        match self.policy.save(path) {
            Ok(()) => {
                info!(path = %path.display(), "policy saved");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save policy");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardConfig, Move, PolicyError, ShipSpec};
    use crate::nn::{EncodedState, SoftmaxPolicy, UniformPolicy};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Uniform policy that counts calls.
    struct CountingPolicy {
        inner: UniformPolicy,
        epsilon: f64,
        train_steps: usize,
        saves: Arc<AtomicUsize>,
        fail_saves: bool,
    }

    impl CountingPolicy {
        fn new(outputs: usize) -> Self {
            Self {
                inner: UniformPolicy::new(outputs),
                epsilon: 1.0,
                train_steps: 0,
                saves: Arc::new(AtomicUsize::new(0)),
                fail_saves: false,
            }
        }
    }

    impl Policy for CountingPolicy {
        fn predict(&self, state: &EncodedState) -> Vec<f32> {
            self.inner.predict(state)
        }
        fn train_step(&mut self, _: &EncodedState, _: Move, _: f64) -> f64 {
            self.train_steps += 1;
            0.0
        }
        fn epsilon(&self) -> f64 {
            self.epsilon
        }
        fn decay_epsilon(&mut self) {
            self.epsilon = (self.epsilon * 0.9).max(0.1);
        }
        fn save(&self, _: &Path) -> Result<(), PolicyError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves {
                Err(PolicyError::ShapeMismatch {
                    expected: 0,
                    found: 1,
                })
            } else {
                Ok(())
            }
        }
        fn load(&mut self, _: &Path) -> Result<(), PolicyError> {
            Ok(())
        }
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig::new()
            .with_board(BoardConfig::new(4, 4).with_ships(vec![ShipSpec::new('#', 2)]))
            .with_seed(11)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = small_config().with_gamma(1.5);
        assert!(matches!(
            Trainer::new(config, UniformPolicy::new(16)),
            Err(TrainingError::Config(_))
        ));
    }

    #[test]
    fn test_run_episode_finishes_board() {
        let mut trainer = Trainer::new(small_config(), UniformPolicy::new(16)).unwrap();
        let episode = trainer.run_episode().unwrap();

        assert!(episode.finished);
        assert_eq!(episode.hit_count(), 2);
        assert_eq!(episode.rewards.len(), episode.len());
        assert!(episode.len() <= 16);
        for (i, step) in episode.steps.iter().enumerate() {
            assert_eq!(step.move_number, i);
        }
    }

    #[test]
    fn test_max_moves_truncates() {
        let config = small_config().with_max_moves(3);
        let mut trainer = Trainer::new(config, UniformPolicy::new(16)).unwrap();
        let episode = trainer.run_episode().unwrap();
        assert!(episode.len() <= 3);
    }

    #[test]
    fn test_train_episode_updates_policy_and_history() {
        let mut trainer = Trainer::new(small_config(), CountingPolicy::new(16)).unwrap();
        let summary = trainer.train_episode().unwrap();

        assert_eq!(summary.episode, 0);
        assert_eq!(trainer.policy().train_steps, summary.moves);
        assert!((trainer.policy().epsilon() - 0.9).abs() < 1e-12);
        assert_eq!(trainer.history().len(), 1);
        assert_eq!(trainer.episodes_run(), 1);
    }

    #[test]
    fn test_save_cadence() {
        let config = small_config()
            .with_episodes(10)
            .with_log_interval(2)
            .with_save_every_logs(2)
            .with_model_path("unused/policy.bin");
        let policy = CountingPolicy::new(16);
        let saves = Arc::clone(&policy.saves);

        let mut trainer = Trainer::new(config, policy).unwrap();
        let report = trainer.train().unwrap();

        // Episodes 4 and 8, plus the final save.
        assert_eq!(saves.load(Ordering::SeqCst), 3);
        assert_eq!(report.saves, 3);
        assert_eq!(report.episodes, 10);
        assert_eq!(trainer.history().len(), 10);
    }

    #[test]
    fn test_no_model_path_skips_saves() {
        let config = small_config().with_episodes(4).with_log_interval(1);
        let policy = CountingPolicy::new(16);
        let saves = Arc::clone(&policy.saves);

        let report = Trainer::new(config, policy).unwrap().train().unwrap();
        assert_eq!(saves.load(Ordering::SeqCst), 0);
        assert_eq!(report.saves, 0);
    }

    #[test]
    fn test_save_failure_does_not_stop_training() {
        let config = small_config()
            .with_episodes(4)
            .with_log_interval(1)
            .with_save_every_logs(1)
            .with_model_path("unused/policy.bin");
        let mut policy = CountingPolicy::new(16);
        policy.fail_saves = true;
        let saves = Arc::clone(&policy.saves);

        let report = Trainer::new(config, policy).unwrap().train().unwrap();
        assert_eq!(report.episodes, 4);
        assert_eq!(report.saves, 0);
        // One attempt per episode; the last one covers the final save.
        assert_eq!(saves.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_no_duplicate_final_save_on_cadence_boundary() {
        let config = small_config()
            .with_episodes(8)
            .with_log_interval(2)
            .with_save_every_logs(2)
            .with_model_path("unused/policy.bin");
        let policy = CountingPolicy::new(16);
        let saves = Arc::clone(&policy.saves);

        let report = Trainer::new(config, policy).unwrap().train().unwrap();

        // Episodes 4 and 8 only.
        assert_eq!(saves.load(Ordering::SeqCst), 2);
        assert_eq!(report.saves, 2);
    }

    #[test]
    fn test_epsilon_decays_monotonically() {
        let config = small_config().with_episodes(30).with_log_interval(10);
        let policy = SoftmaxPolicy::for_board(&config.board);
        let mut trainer = Trainer::new(config, policy).unwrap();

        let mut last = trainer.policy().epsilon();
        for _ in 0..30 {
            let summary = trainer.train_episode().unwrap();
            assert!(summary.epsilon <= last);
            last = summary.epsilon;
        }
        assert!(last < 1.0);
    }

    #[test]
    fn test_training_is_deterministic() {
        let config = small_config().with_episodes(5).with_log_interval(5);
        let a = Trainer::new(config.clone(), UniformPolicy::new(16))
            .unwrap()
            .train()
            .unwrap();
        let b = Trainer::new(config, UniformPolicy::new(16))
            .unwrap()
            .train()
            .unwrap();
        assert_eq!(a, b);
    }
}
