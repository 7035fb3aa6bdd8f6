//! Environment contract consumed by the training runner.
//!
//! Environments implement `Environment` to define:
//! - The initial state of an episode
//! - How an action transforms a state (returning a new one)
//! - When an episode ends

mod environment;

pub use environment::{Environment, StepResult};
