//! Self-play training: reward shaping, episode records, and the loop that
//! ties games to a policy.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use battleship_rl::nn::SoftmaxPolicy;
//! use battleship_rl::training::{Trainer, TrainingConfig};
//!
//! let config = TrainingConfig::default()
//!     .with_episodes(500)
//!     .with_model_path("models/policy.bin");
//! let policy = SoftmaxPolicy::for_board(&config.board);
//!
//! let mut trainer = Trainer::new(config, policy)?;
//! let report = trainer.train()?;
//! println!("average moves: {:.1}", report.average_moves());
//! # Ok::<(), battleship_rl::core::TrainingError>(())
//! ```

pub mod config;
pub mod episode;
pub mod reward;
pub mod runner;

pub use config::TrainingConfig;
pub use episode::{Episode, EpisodeSummary, Step, TrainingHistory, TrainingSample};
pub use reward::shape_rewards;
pub use runner::{Trainer, TrainingReport};
