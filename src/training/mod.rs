//! On-policy PPO training.
//!
//! ## Overview
//!
//! - **PpoConfig**: discount, epochs, step sizes, step cap
//! - **Trajectory**: one episode of transitions with TD(0) advantages
//! - **TrajectoryRunner**: rollout, advantage pass and epoch loop
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tiny_ppo::nn::ActorCritic;
//! use tiny_ppo::training::{PpoConfig, TrajectoryRunner};
//!
//! let network = ActorCritic::new(encoder.feature_count(), 32, 2, Some(1234))?;
//! let mut runner = TrajectoryRunner::new(network, encoder, PpoConfig::default())?;
//!
//! let outcome = runner.run_episode(&mut env)?;
//! println!("{} steps, reward {}", outcome.steps, outcome.total_reward);
//! ```

pub mod config;
pub mod runner;
pub mod trajectory;

// Re-export main types
pub use config::PpoConfig;
pub use runner::{EpisodeOutcome, Rollout, TrajectoryRunner};
pub use trajectory::{Trajectory, Transition};
