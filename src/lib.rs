//! # tiny-ppo
//!
//! A small actor-critic trained with clipped PPO updates, one episode at a
//! time, on discrete-action environments.
//!
//! ## Design Principles
//!
//! 1. **Environment-Agnostic**: The runner only sees `Environment` and
//!    `StateEncoder`. Games plug in their own state and features.
//!
//! 2. **Deterministic**: Every random draw goes through an explicitly owned
//!    `TrainRng`. Same seed, same parameters, bit for bit.
//!
//! 3. **Configuration Over Convention**: Hyperparameters live in serde
//!    config structs with builder setters and `validate()`.
//!
//! ## Architecture
//!
//! - **Shared trunk**: one tanh hidden layer feeds a softmax actor head and a
//!   linear critic head.
//!
//! - **Per-transition updates**: TD(0) advantages from one frozen critic
//!   pass, then several epochs of single-sample PPO steps with an
//!   all-or-nothing clip gate and an entropy bonus.
//!
//! ## Modules
//!
//! - `core`: errors and RNG
//! - `nn`: encoders, math helpers and the actor-critic network
//! - `env`: the environment trait
//! - `training`: PPO config, trajectories and the episode runner
//! - `games`: concrete environments (combat simulation)

pub mod core;
pub mod env;
pub mod games;
pub mod nn;
pub mod training;

// Re-export commonly used types
pub use crate::core::{Error, Result, TrainRng};

pub use crate::env::{Environment, StepResult};

pub use crate::nn::{
    ActionSample, ActorCritic, IdentityEncoder, LearningRates, Parameters, PolicyNetwork,
    StateEncoder, UpdateReport, ValueNetwork,
};

pub use crate::training::{EpisodeOutcome, PpoConfig, Trajectory, TrajectoryRunner, Transition};

pub use crate::games::combat::{CombatEncoder, CombatEnv, CombatTrainer, TrainerConfig};
