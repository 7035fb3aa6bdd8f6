//! Small numerical kernels shared by the network and its tests.

/// Xavier/Glorot uniform bound `sqrt(6 / (fan_in + fan_out))`.
#[must_use]
pub fn xavier_limit(fan_in: usize, fan_out: usize) -> f64 {
    (6.0 / (fan_in + fan_out) as f64).sqrt()
}

/// Numerically stable softmax: subtract the max logit, exponentiate, normalize.
///
/// `out` must be the same length as `logits`. Empty input leaves `out` empty.
pub fn softmax_into(logits: &[f64], out: &mut [f64]) {
    debug_assert_eq!(logits.len(), out.len());

    let max = logits.iter().fold(f64::NEG_INFINITY, |m, &z| m.max(z));

    let mut sum = 0.0;
    for (o, &z) in out.iter_mut().zip(logits) {
        let e = (z - max).exp();
        *o = e;
        sum += e;
    }
    let inv = 1.0 / sum;
    for o in out.iter_mut() {
        *o *= inv;
    }
}

/// Allocating wrapper around [`softmax_into`].
#[must_use]
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; logits.len()];
    softmax_into(logits, &mut out);
    out
}

/// Inverse-CDF draw: first index whose running sum reaches `r`.
///
/// When round-off leaves the total short of `r`, the last index is returned.
#[must_use]
pub fn sample_index(probs: &[f64], r: f64) -> usize {
    let mut cdf = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cdf += p;
        if r <= cdf {
            return i;
        }
    }
    probs.len() - 1
}
