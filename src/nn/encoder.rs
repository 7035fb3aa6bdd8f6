//! State encoding for neural network input.
//!
//! Transforms environment state into a fixed-width feature vector with every
//! component in `[-1, 1]`. Encoders are pure: no learnable or mutable state.

use crate::core::{Error, Result};

/// Encodes environment state into a fixed-width feature vector.
pub trait StateEncoder {
    /// Domain state this encoder understands.
    type State;

    /// Number of features every encoding produces.
    fn feature_count(&self) -> usize;

    /// Encode a state.
    ///
    /// Fails with [`Error::FeatureCountMismatch`] if the produced width differs
    /// from [`feature_count`](Self::feature_count).
    fn encode(&self, state: &Self::State) -> Result<Vec<f64>>;
}

/// Linear min-max normalization of `v` into `[-1, 1]` after clamping to `[lo, hi]`.
///
/// A degenerate range (`hi <= lo`) maps everything to 0.
#[must_use]
pub fn min_max(v: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return 0.0;
    }
    let unit = (v.clamp(lo, hi) - lo) / (hi - lo);
    2.0 * unit - 1.0
}

/// Soft saturation for unbounded counters.
///
/// `z = max(0, v) / pivot`, mapped through `z / sqrt(1 + z^2)` and rescaled to
/// `[-1, 1)`. Zero maps to -1, `pivot` to about 0.41, large values approach +1.
#[must_use]
pub fn soft_saturate(v: f64, pivot: f64) -> f64 {
    let p = pivot.max(1e-9);
    let z = v.max(0.0) / p;
    let unit = z / (1.0 + z * z).sqrt();
    2.0 * unit - 1.0
}

/// Append-only feature buffer that checks its final width.
#[derive(Debug)]
pub struct FeatureWriter {
    features: Vec<f64>,
    declared: usize,
}

impl FeatureWriter {
    /// Start a vector that must end up with `declared` features.
    pub fn new(declared: usize) -> Self {
        Self {
            features: Vec::with_capacity(declared),
            declared,
        }
    }

    /// Append a raw feature.
    pub fn push(&mut self, value: f64) -> &mut Self {
        self.features.push(value);
        self
    }

    /// Append a min-max normalized feature.
    pub fn min_max(&mut self, v: f64, lo: f64, hi: f64) -> &mut Self {
        self.push(min_max(v, lo, hi))
    }

    /// Append a soft-saturated counter.
    pub fn soft(&mut self, v: f64, pivot: f64) -> &mut Self {
        self.push(soft_saturate(v, pivot))
    }

    /// Append a boolean flag as `+1` / `-1`.
    pub fn flag(&mut self, on: bool) -> &mut Self {
        self.push(if on { 1.0 } else { -1.0 })
    }

    /// Finish, verifying the declared width.
    pub fn finish(self) -> Result<Vec<f64>> {
        if self.features.len() != self.declared {
            return Err(Error::FeatureCountMismatch {
                declared: self.declared,
                produced: self.features.len(),
            });
        }
        Ok(self.features)
    }
}

/// Encoder for environments whose state already is a feature vector.
///
/// Only checks the width; values pass through unchanged.
#[derive(Clone, Debug)]
pub struct IdentityEncoder {
    width: usize,
}

impl IdentityEncoder {
    /// Create an encoder for vectors of the given width.
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl StateEncoder for IdentityEncoder {
    type State = Vec<f64>;

    fn feature_count(&self) -> usize {
        self.width
    }

    fn encode(&self, state: &Vec<f64>) -> Result<Vec<f64>> {
        let mut writer = FeatureWriter::new(self.width);
        for &v in state {
            writer.push(v);
        }
        writer.finish()
    }
}
