//! Neural network: feature encoding and the actor-critic model.
//!
//! ## Overview
//!
//! - **Traits**: `PolicyNetwork`, `ValueNetwork`
//! - **Encoding**: `StateEncoder` trait, normalization helpers, `IdentityEncoder`
//! - **Model**: `ActorCritic` with forward inference and the PPO update
//! - **Baseline**: `ZeroValue` critic for testing
//!
//! ## Usage
//!
//! ```
//! use tiny_ppo::nn::{ActorCritic, LearningRates};
//!
//! let mut net = ActorCritic::new(3, 8, 2, Some(42)).unwrap();
//! let state = [0.1, -0.5, 0.9];
//!
//! let sample = net.sample(&state);
//! let value = net.value(&state);
//! let advantage = 1.0 - value;
//!
//! net.update(&state, sample.action, sample.prob, advantage, LearningRates::new(0.06, 0.04, 0.02));
//! ```

pub mod encoder;
pub mod math;
pub mod network;
pub mod traits;

// Re-export main types
pub use encoder::{min_max, soft_saturate, FeatureWriter, IdentityEncoder, StateEncoder};
pub use network::{
    is_clipped, ActionSample, Activations, ActorCritic, LearningRates, Parameters, UpdateReport,
    ADVANTAGE_CLIP, CLIP_EPSILON, ENTROPY_BETA, PROB_EPSILON,
};
pub use traits::{PolicyNetwork, ValueNetwork, ZeroValue};
