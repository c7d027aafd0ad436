//! Self-play training driver.
//!
//! ```text
//! RUST_LOG=info train --episodes 3000 --model models/policy.bin --history history.json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use battleship_rl::nn::{load_or_default, SoftmaxPolicy};
use battleship_rl::training::{Trainer, TrainingConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Train a Battleship policy by self-play")]
struct Args {
    /// JSON training config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of episodes to run
    #[arg(long)]
    episodes: Option<usize>,

    /// Policy file to load from and save to
    #[arg(long)]
    model: Option<PathBuf>,

    /// Seed for layouts and move selection
    #[arg(long)]
    seed: Option<u64>,

    /// Write per-episode history as JSON to this path
    #[arg(long)]
    history: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrainingConfig::default(),
    };
    if let Some(episodes) = args.episodes {
        config = config.with_episodes(episodes);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(model) = args.model {
        config = config.with_model_path(model);
    }

    let mut policy = SoftmaxPolicy::for_board(&config.board);
    if let Some(path) = &config.model_path {
        load_or_default(&mut policy, path);
    }

    let mut trainer = Trainer::new(config, policy).context("creating trainer")?;
    let report = trainer.train()?;
    println!(
        "{} episodes, {} wins, {:.2} moves/episode, epsilon {:.4}",
        report.episodes,
        report.wins,
        report.average_moves(),
        report.final_epsilon
    );

    if let Some(path) = &args.history {
        trainer
            .history()
            .write_json(path)
            .with_context(|| format!("writing history {}", path.display()))?;
        info!(path = %path.display(), "history written");
    }
    Ok(())
}
