//! Deterministic random number generation for training.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Explicitly owned**: Every consumer (network, environment) holds its own
//!   handle; nothing is process-wide
//! - **Context streams**: Independent sequences derived from one master seed
//!
//! ## Usage
//!
//! ```
//! use tiny_ppo::core::TrainRng;
//!
//! let master = TrainRng::new(1234);
//!
//! // Independent streams for weight init/sampling and the simulation
//! let mut net_rng = master.for_context("network");
//! let mut env_rng = master.for_context("environment");
//!
//! let r = net_rng.next_f64();
//! assert!((0.0..1.0).contains(&r));
//! assert_ne!(net_rng.seed(), env_rng.seed());
//! # let _ = env_rng.next_f64();
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used for weight initialization, action sampling and
/// environment dice rolls.
///
/// Uses ChaCha8 for speed while keeping reproducible streams across platforms.
/// Not thread-safe by intent: each caller owns its handle.
#[derive(Clone, Debug)]
pub struct TrainRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl TrainRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    /// The derived seed is FNV-1a over the little-endian seed bytes followed by
    /// the context bytes, so it does not change between toolchains.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        let bytes = self.seed.to_le_bytes();
        let seed = bytes
            .iter()
            .chain(context.as_bytes())
            .fold(FNV_OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME));
        Self::new(seed)
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform draw in `[min, max)` as `min + (max - min) * u`.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }
}
