//! PPO hyperparameters.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::nn::LearningRates;

/// Configuration for the trajectory runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PpoConfig {
    /// Discount factor for the one-step bootstrap.
    pub gamma: f64,

    /// Passes over each episode's trajectory.
    pub epochs: usize,

    /// Critic head step size.
    pub critic_alpha: f64,

    /// Actor head step size.
    pub actor_alpha: f64,

    /// Shared trunk step size.
    pub trunk_alpha: f64,

    /// Hard cap on steps per episode. Hitting it truncates without marking
    /// the last transition terminal.
    pub max_steps: usize,
}

impl Default for PpoConfig {
    fn default() -> Self {
        let actor_alpha = 0.04;
        Self {
            gamma: 0.99,
            epochs: 4,
            critic_alpha: 0.06,
            actor_alpha,
            trunk_alpha: 0.5 * actor_alpha,
            max_steps: 999,
        }
    }
}

impl PpoConfig {
    /// Create a config with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the discount factor.
    #[must_use]
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the number of update epochs per episode.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set all three step sizes.
    #[must_use]
    pub fn with_learning_rates(mut self, rates: LearningRates) -> Self {
        self.critic_alpha = rates.critic;
        self.actor_alpha = rates.actor;
        self.trunk_alpha = rates.trunk;
        self
    }

    /// Set the per-episode step cap.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Step sizes as passed to the network update.
    #[must_use]
    pub fn learning_rates(&self) -> LearningRates {
        LearningRates::new(self.critic_alpha, self.actor_alpha, self.trunk_alpha)
    }

    /// Reject values the update rule cannot use.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::invalid(format!("gamma must be in [0, 1], got {}", self.gamma)));
        }
        if self.epochs == 0 {
            return Err(Error::invalid("epochs must be at least 1"));
        }
        if self.max_steps == 0 {
            return Err(Error::invalid("max_steps must be at least 1"));
        }
        for (name, alpha) in [
            ("critic_alpha", self.critic_alpha),
            ("actor_alpha", self.actor_alpha),
            ("trunk_alpha", self.trunk_alpha),
        ] {
            if !alpha.is_finite() || alpha < 0.0 {
                return Err(Error::invalid(format!("{name} must be finite and >= 0, got {alpha}")));
            }
        }
        Ok(())
    }
}
