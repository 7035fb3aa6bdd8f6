//! Core building blocks shared by every layer: RNG and errors.

pub mod error;
pub mod rng;

pub use error::{Error, Result};
pub use rng::TrainRng;
