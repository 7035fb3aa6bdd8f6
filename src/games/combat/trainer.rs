//! End-to-end training on the combat simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{Error, Result, TrainRng};
use crate::nn::{ActorCritic, StateEncoder};
use crate::training::{PpoConfig, TrajectoryRunner};

use super::encoder::{CombatEncoder, EncoderBounds};
use super::game::CombatEnv;
use super::state::{CombatAction, CombatConfig};
use super::stats::{EpisodeStats, StatsWindow, WindowReport};

/// Everything needed to reproduce a training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Episodes to train.
    pub episodes: u64,

    /// Episodes per reporting window.
    pub log_every: u64,

    /// Master seed. Network and environment streams are derived from it.
    pub seed: u64,

    /// Trunk width.
    pub hidden_units: usize,

    pub ppo: PpoConfig,
    pub combat: CombatConfig,
    pub bounds: EncoderBounds,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 1_000_000,
            log_every: 10_000,
            seed: 1234,
            hidden_units: 32,
            ppo: PpoConfig::default(),
            combat: CombatConfig::default(),
            bounds: EncoderBounds::default(),
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn with_episodes(mut self, episodes: u64) -> Self {
        self.episodes = episodes;
        self
    }

    #[must_use]
    pub fn with_log_every(mut self, log_every: u64) -> Self {
        self.log_every = log_every;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_hidden_units(mut self, hidden_units: usize) -> Self {
        self.hidden_units = hidden_units;
        self
    }

    #[must_use]
    pub fn with_ppo(mut self, ppo: PpoConfig) -> Self {
        self.ppo = ppo;
        self
    }

    #[must_use]
    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_every == 0 {
            return Err(Error::invalid("log_every must be at least 1"));
        }
        if self.hidden_units == 0 {
            return Err(Error::invalid("hidden_units must be at least 1"));
        }
        self.ppo.validate()?;
        self.combat.validate()?;
        self.bounds.validate()
    }
}

/// Result of a training run.
#[derive(Clone, Debug)]
pub struct TrainingSummary {
    /// Episodes played.
    pub episodes: u64,

    /// One report per completed window.
    pub reports: Vec<WindowReport>,

    /// Mean of the windows' average rewards (0 when no window completed).
    pub mean_window_reward: f64,

    /// The trained network.
    pub network: ActorCritic,
}

/// Trains an actor-critic on [`CombatEnv`].
#[derive(Clone, Debug)]
pub struct CombatTrainer {
    config: TrainerConfig,
}

impl CombatTrainer {
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Fresh runner and environment seeded from the master seed.
    pub fn build(&self) -> Result<(TrajectoryRunner<CombatEncoder>, CombatEnv)> {
        let master = TrainRng::new(self.config.seed);
        let encoder = CombatEncoder::new(self.config.bounds.clone());

        let network = ActorCritic::with_rng(
            encoder.feature_count(),
            self.config.hidden_units,
            CombatAction::COUNT,
            master.for_context("network"),
        )?;
        let env = CombatEnv::new(self.config.combat.clone(), master.for_context("environment"))?;
        let runner = TrajectoryRunner::new(network, encoder, self.config.ppo.clone())?;

        Ok((runner, env))
    }

    /// Train for the configured number of episodes.
    pub fn run(&self) -> Result<TrainingSummary> {
        self.run_with(|_| {})
    }

    /// Train, handing every window report to `on_report` as it completes.
    pub fn run_with<F>(&self, mut on_report: F) -> Result<TrainingSummary>
    where
        F: FnMut(&WindowReport),
    {
        let (mut runner, mut env) = self.build()?;
        let mut window = StatsWindow::new();
        let mut reports = Vec::new();

        info!(
            episodes = self.config.episodes,
            seed = self.config.seed,
            hidden_units = self.config.hidden_units,
            "training started"
        );

        for episode in 1..=self.config.episodes {
            let outcome = runner.run_episode(&mut env)?;
            window.push(&EpisodeStats::from_outcome(&outcome, env.counters()));

            if episode % self.config.log_every == 0 {
                if let Some(report) = window.report(episode) {
                    info!("{report}");
                    if report.truncated == report.episodes {
                        warn!(episode, "every episode in the window hit the step cap");
                    }
                    on_report(&report);
                    reports.push(report);
                }
            }
        }

        let mean_window_reward = if reports.is_empty() {
            0.0
        } else {
            reports.iter().map(|r| r.avg_reward).sum::<f64>() / reports.len() as f64
        };

        info!(
            episodes = self.config.episodes,
            windows = reports.len(),
            mean_window_reward,
            "training finished"
        );

        Ok(TrainingSummary {
            episodes: self.config.episodes,
            reports,
            mean_window_reward,
            network: runner.into_network(),
        })
    }
}
