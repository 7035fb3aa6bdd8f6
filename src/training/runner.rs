//! Episode loop: roll out, compute advantages, run the PPO epochs.
//!
//! The runner owns the network and the encoder; the environment is borrowed
//! per episode so callers can inspect it between episodes.

use tracing::debug;

use crate::core::{Error, Result};
use crate::env::{Environment, StepResult};
use crate::nn::{ActionSample, ActorCritic, StateEncoder};

use super::config::PpoConfig;
use super::trajectory::{Trajectory, Transition};

/// Summary of one trained episode.
#[derive(Clone, Debug)]
pub struct EpisodeOutcome<S> {
    /// Number of recorded transitions.
    pub steps: usize,

    /// Sum of rewards.
    pub total_reward: f64,

    /// Environment state after the last step.
    pub terminal_state: S,

    /// True when the step cap ended the episode rather than the environment.
    pub truncated: bool,

    /// How often each action was sampled.
    pub action_counts: Vec<usize>,

    /// Number of clip-suppressed updates in each epoch.
    pub clipped_per_epoch: Vec<usize>,
}

/// A finished rollout before any training.
#[derive(Clone, Debug)]
pub struct Rollout<S> {
    pub trajectory: Trajectory,
    pub terminal_state: S,
    pub truncated: bool,
    pub action_counts: Vec<usize>,
}

/// Runs on-policy episodes and trains the network after each one.
pub struct TrajectoryRunner<C: StateEncoder> {
    network: ActorCritic,
    encoder: C,
    config: PpoConfig,
}

impl<C: StateEncoder> TrajectoryRunner<C> {
    /// Create a runner.
    ///
    /// Fails if the config is invalid or the encoder width differs from the
    /// network input layer.
    pub fn new(network: ActorCritic, encoder: C, config: PpoConfig) -> Result<Self> {
        config.validate()?;
        if encoder.feature_count() != network.input_dim() {
            return Err(Error::InputDimMismatch {
                encoder: encoder.feature_count(),
                network: network.input_dim(),
            });
        }
        Ok(Self {
            network,
            encoder,
            config,
        })
    }

    pub fn network(&self) -> &ActorCritic {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut ActorCritic {
        &mut self.network
    }

    pub fn encoder(&self) -> &C {
        &self.encoder
    }

    pub fn config(&self) -> &PpoConfig {
        &self.config
    }

    /// Give back the trained network.
    pub fn into_network(self) -> ActorCritic {
        self.network
    }

    /// Play and train on one episode.
    pub fn run_episode<E>(&mut self, env: &mut E) -> Result<EpisodeOutcome<E::State>>
    where
        E: Environment<State = C::State>,
    {
        let Rollout {
            mut trajectory,
            terminal_state,
            truncated,
            action_counts,
        } = self.rollout(env)?;

        let clipped_per_epoch = self.train_on(&mut trajectory);

        debug!(
            steps = trajectory.len(),
            total_reward = trajectory.total_reward(),
            truncated,
            clipped = ?clipped_per_epoch,
            "episode trained"
        );

        Ok(EpisodeOutcome {
            steps: trajectory.len(),
            total_reward: trajectory.total_reward(),
            terminal_state,
            truncated,
            action_counts,
            clipped_per_epoch,
        })
    }

    /// Play one episode with the current policy, recording every step.
    ///
    /// The network is not modified apart from its sampling RNG.
    pub fn rollout<E>(&mut self, env: &mut E) -> Result<Rollout<E::State>>
    where
        E: Environment<State = C::State>,
    {
        let action_count = self.network.action_count();
        if env.action_count() != action_count {
            return Err(Error::invalid(format!(
                "environment has {} actions, network has {action_count}",
                env.action_count()
            )));
        }

        let mut trajectory = Trajectory::new();
        let mut action_counts = vec![0; action_count];
        let mut truncated = false;

        let mut state = env.reset();
        let mut features = self.encoder.encode(&state)?;

        loop {
            let ActionSample { action, prob } = self.network.sample(&features);
            let StepResult {
                state: next,
                reward,
                done,
            } = env.step(&state, action);
            let next_features = self.encoder.encode(&next)?;

            action_counts[action] += 1;
            trajectory.push(Transition::new(
                features,
                action,
                prob,
                reward,
                next_features.clone(),
                done,
            ));

            state = next;
            features = next_features;

            if done {
                break;
            }
            if trajectory.len() >= self.config.max_steps {
                debug!(max_steps = self.config.max_steps, "episode truncated at step cap");
                truncated = true;
                break;
            }
        }

        Ok(Rollout {
            trajectory,
            terminal_state: state,
            truncated,
            action_counts,
        })
    }

    /// Fill in advantages from one critic snapshot, then run the epochs.
    ///
    /// Returns the number of clipped updates per epoch.
    pub fn train_on(&mut self, trajectory: &mut Trajectory) -> Vec<usize> {
        trajectory.compute_advantages(&self.network, self.config.gamma);

        let rates = self.config.learning_rates();
        let mut clipped_per_epoch = Vec::with_capacity(self.config.epochs);

        for _ in 0..self.config.epochs {
            let mut clipped = 0;
            for t in trajectory.iter() {
                let report =
                    self.network
                        .update_with_report(&t.state, t.action, t.old_prob, t.advantage, rates);
                if report.clipped {
                    clipped += 1;
                }
            }
            clipped_per_epoch.push(clipped);
        }

        clipped_per_epoch
    }
}
