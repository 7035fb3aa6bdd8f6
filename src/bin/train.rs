//! Train the combat agent.
//!
//! ```text
//! train --episodes 200000 --log-every 5000
//! RUST_LOG=debug train --config run.json --seed 7
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tiny_ppo::games::combat::{CombatTrainer, TrainerConfig};

#[derive(Parser, Debug)]
#[command(name = "train", about = "PPO actor-critic training on the combat simulation")]
struct Args {
    /// JSON trainer config; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Episodes to train
    #[arg(long)]
    episodes: Option<u64>,

    /// Episodes per report window
    #[arg(long)]
    log_every: Option<u64>,

    /// Master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Hidden layer width
    #[arg(long)]
    hidden: Option<usize>,

    /// Write all window reports to this file as JSON
    #[arg(long)]
    reports_out: Option<PathBuf>,
}

impl Args {
    fn trainer_config(&self) -> Result<TrainerConfig> {
        let mut config = match &self.config {
            Some(path) => TrainerConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => TrainerConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config = config.with_episodes(episodes);
        }
        if let Some(log_every) = self.log_every {
            config = config.with_log_every(log_every);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(hidden) = self.hidden {
            config = config.with_hidden_units(hidden);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.trainer_config()?;
    let trainer = CombatTrainer::new(config).context("invalid trainer config")?;

    let summary = trainer.run().context("training failed")?;
    info!(
        mean_window_reward = summary.mean_window_reward,
        "avg of window rewards {:.4}",
        summary.mean_window_reward
    );

    if let Some(path) = &args.reports_out {
        let json = serde_json::to_string_pretty(&summary.reports)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote window reports");
    }

    Ok(())
}
