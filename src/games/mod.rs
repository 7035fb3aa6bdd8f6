//! Environments built on the training engine.
//!
//! - `combat`: single-opponent melee simulation with a 17-feature encoder

pub mod combat;
