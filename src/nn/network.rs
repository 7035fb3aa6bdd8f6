//! Shallow actor-critic network with a hand-derived PPO update.
//!
//! Architecture: one shared tanh trunk feeding a softmax policy head (actor)
//! and a scalar value head (critic).
//!
//! ```text
//! hidden = tanh(W_ih · x + b_h)
//! logits = W_ha · hidden + b_a      probs = softmax(logits)
//! value  = w_hv · hidden + b_v
//! ```
//!
//! All parameters are owned by [`ActorCritic`] and mutated only by
//! [`ActorCritic::update`]. Forward passes write into call-local
//! [`Activations`], so inference takes `&self`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Error, Result, TrainRng};
use crate::nn::math::{sample_index, softmax_into, xavier_limit};
use crate::nn::traits::{PolicyNetwork, ValueNetwork};

/// Guards `ln(0)` in the entropy term and division by a zero behavior probability.
pub const PROB_EPSILON: f64 = 1e-12;

/// PPO trust region half-width.
pub const CLIP_EPSILON: f64 = 0.2;

/// Entropy bonus coefficient. Applied even when the policy term is clipped.
pub const ENTROPY_BETA: f64 = 0.005;

/// Advantages are clamped to `[-ADVANTAGE_CLIP, ADVANTAGE_CLIP]` before use.
pub const ADVANTAGE_CLIP: f64 = 5.0;

/// Critic snapshots up to this many hidden units stay on the stack.
const INLINE_HIDDEN: usize = 64;

/// Step sizes for the three parameter groups.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningRates {
    /// Critic head.
    pub critic: f64,
    /// Actor head.
    pub actor: f64,
    /// Shared trunk.
    pub trunk: f64,
}

impl LearningRates {
    pub fn new(critic: f64, actor: f64, trunk: f64) -> Self {
        Self { critic, actor, trunk }
    }
}

/// Every learnable parameter, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    pub input_dim: usize,
    pub hidden_units: usize,
    pub action_count: usize,

    /// Trunk weights `[hidden][input]`.
    pub w_ih: Vec<f64>,
    /// Trunk bias `[hidden]`.
    pub b_h: Vec<f64>,

    /// Actor weights `[actions][hidden]`.
    pub w_ha: Vec<f64>,
    /// Actor bias `[actions]`.
    pub b_a: Vec<f64>,

    /// Critic weights `[hidden]`.
    pub w_hv: Vec<f64>,
    /// Critic bias.
    pub b_v: f64,
}

impl Parameters {
    /// All-zero parameters of the given shape.
    pub fn zeros(input_dim: usize, hidden_units: usize, action_count: usize) -> Result<Self> {
        check_dims(input_dim, hidden_units, action_count)?;
        Ok(Self {
            input_dim,
            hidden_units,
            action_count,
            w_ih: vec![0.0; hidden_units * input_dim],
            b_h: vec![0.0; hidden_units],
            w_ha: vec![0.0; action_count * hidden_units],
            b_a: vec![0.0; action_count],
            w_hv: vec![0.0; hidden_units],
            b_v: 0.0,
        })
    }

    /// Check that every buffer matches the declared dimensions.
    pub fn validate(&self) -> Result<()> {
        check_dims(self.input_dim, self.hidden_units, self.action_count)?;

        let (d, h, a) = (self.input_dim, self.hidden_units, self.action_count);
        let expected = [
            ("w_ih", self.w_ih.len(), h * d),
            ("b_h", self.b_h.len(), h),
            ("w_ha", self.w_ha.len(), a * h),
            ("b_a", self.b_a.len(), a),
            ("w_hv", self.w_hv.len(), h),
        ];
        for (name, got, want) in expected {
            if got != want {
                return Err(Error::invalid(format!("{name} has {got} entries, expected {want}")));
            }
        }
        Ok(())
    }

    /// Trunk weight row for hidden unit `h`.
    #[must_use]
    pub fn trunk_row(&self, h: usize) -> &[f64] {
        &self.w_ih[h * self.input_dim..(h + 1) * self.input_dim]
    }

    /// Actor weight row for action `k`.
    #[must_use]
    pub fn actor_row(&self, k: usize) -> &[f64] {
        &self.w_ha[k * self.hidden_units..(k + 1) * self.hidden_units]
    }
}

fn check_dims(input_dim: usize, hidden_units: usize, action_count: usize) -> Result<()> {
    if input_dim == 0 || hidden_units == 0 || action_count < 2 {
        return Err(Error::invalid(format!(
            "input_dim>0, hidden_units>0, action_count>1 required \
             (got input_dim={input_dim}, hidden_units={hidden_units}, action_count={action_count})"
        )));
    }
    Ok(())
}

/// Intermediate values of one forward pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Activations {
    pub hidden: Vec<f64>,
    pub logits: Vec<f64>,
    pub probs: Vec<f64>,
}

/// A sampled action together with its probability under the sampling policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionSample {
    pub action: usize,
    pub prob: f64,
}

/// Diagnostics from a single PPO update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateReport {
    /// The advantage as passed in (before clamping).
    pub advantage: f64,
    /// Importance ratio `pi_new / pi_old` at update time.
    pub ratio: f64,
    /// Whether the policy-gradient term was suppressed.
    pub clipped: bool,
}

/// Direction-aware PPO gate.
///
/// Positive advantages are clipped once the ratio exceeds `1 + eps`, negative
/// ones once it falls below `1 - eps`. Both comparisons are strict.
#[must_use]
pub fn is_clipped(ratio: f64, advantage: f64) -> bool {
    if advantage >= 0.0 {
        ratio > 1.0 + CLIP_EPSILON
    } else {
        ratio < 1.0 - CLIP_EPSILON
    }
}

/// Actor-critic network with its own sampling RNG.
#[derive(Clone, Debug)]
pub struct ActorCritic {
    params: Parameters,
    rng: TrainRng,
}

impl ActorCritic {
    /// Create a Xavier-initialized network.
    ///
    /// `seed = None` draws a seed from OS entropy.
    pub fn new(
        input_dim: usize,
        hidden_units: usize,
        action_count: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        let rng = seed.map_or_else(TrainRng::from_entropy, TrainRng::new);
        Self::with_rng(input_dim, hidden_units, action_count, rng)
    }

    /// Create a Xavier-initialized network drawing from an existing RNG stream.
    ///
    /// The same stream is kept for action sampling afterwards.
    pub fn with_rng(
        input_dim: usize,
        hidden_units: usize,
        action_count: usize,
        mut rng: TrainRng,
    ) -> Result<Self> {
        let mut params = Parameters::zeros(input_dim, hidden_units, action_count)?;

        let limit = xavier_limit(input_dim, hidden_units);
        for w in &mut params.w_ih {
            *w = rng.uniform(-limit, limit);
        }

        let limit = xavier_limit(hidden_units, action_count);
        for w in &mut params.w_ha {
            *w = rng.uniform(-limit, limit);
        }

        let limit = xavier_limit(hidden_units, 1);
        for w in &mut params.w_hv {
            *w = rng.uniform(-limit, limit);
        }

        Ok(Self { params, rng })
    }

    /// Wrap explicit parameters (validated).
    pub fn from_parameters(params: Parameters, rng: TrainRng) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, rng })
    }

    /// Read-only view of the parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.params.input_dim
    }

    #[must_use]
    pub fn hidden_units(&self) -> usize {
        self.params.hidden_units
    }

    #[must_use]
    pub fn action_count(&self) -> usize {
        self.params.action_count
    }

    /// Trunk only: `tanh(W_ih · x + b_h)`.
    ///
    /// # Panics
    ///
    /// If `state` does not have `input_dim` features.
    #[must_use]
    pub fn hidden(&self, state: &[f64]) -> Vec<f64> {
        assert_eq!(
            state.len(),
            self.params.input_dim,
            "state has {} features, network expects {}",
            state.len(),
            self.params.input_dim
        );

        (0..self.params.hidden_units)
            .map(|h| {
                let mut z = self.params.b_h[h];
                for (w, x) in self.params.trunk_row(h).iter().zip(state) {
                    z += w * x;
                }
                z.tanh()
            })
            .collect()
    }

    /// Full forward pass: hidden, logits and probabilities.
    #[must_use]
    pub fn forward(&self, state: &[f64]) -> Activations {
        let hidden = self.hidden(state);

        let logits: Vec<f64> = (0..self.params.action_count)
            .map(|k| {
                let mut z = self.params.b_a[k];
                for (w, h) in self.params.actor_row(k).iter().zip(&hidden) {
                    z += w * h;
                }
                z
            })
            .collect();

        let mut probs = vec![0.0; logits.len()];
        softmax_into(&logits, &mut probs);

        Activations { hidden, logits, probs }
    }

    fn value_from_hidden(&self, hidden: &[f64]) -> f64 {
        let mut v = self.params.b_v;
        for (w, h) in self.params.w_hv.iter().zip(hidden) {
            v += w * h;
        }
        v
    }

    /// Action distribution for `state` (an owned copy).
    #[must_use]
    pub fn policy_probs(&self, state: &[f64]) -> Vec<f64> {
        self.forward(state).probs
    }

    /// Probability of `action` in `state`.
    #[must_use]
    pub fn policy_prob(&self, state: &[f64], action: usize) -> f64 {
        self.forward(state).probs[action]
    }

    /// Critic estimate; skips the actor head entirely.
    #[must_use]
    pub fn value(&self, state: &[f64]) -> f64 {
        let hidden = self.hidden(state);
        self.value_from_hidden(&hidden)
    }

    /// Draw an action from the current policy, returning its probability too.
    ///
    /// Consumes exactly one uniform draw from the network's RNG.
    pub fn sample(&mut self, state: &[f64]) -> ActionSample {
        let probs = self.forward(state).probs;
        let r = self.rng.next_f64();
        let action = sample_index(&probs, r);
        ActionSample {
            action,
            prob: probs[action],
        }
    }

    /// Draw an action index from the current policy.
    pub fn sample_action(&mut self, state: &[f64]) -> usize {
        self.sample(state).action
    }

    /// One PPO step on a single transition.
    ///
    /// Returns `advantage` unchanged; see [`update_with_report`](Self::update_with_report)
    /// for the ratio and clip decision.
    pub fn update(
        &mut self,
        state: &[f64],
        action: usize,
        old_prob: f64,
        advantage: f64,
        rates: LearningRates,
    ) -> f64 {
        self.update_with_report(state, action, old_prob, advantage, rates)
            .advantage
    }

    /// One PPO step on a single transition, with diagnostics.
    ///
    /// # Panics
    ///
    /// If `action` is out of range or `state` has the wrong width.
    pub fn update_with_report(
        &mut self,
        state: &[f64],
        action: usize,
        old_prob: f64,
        advantage: f64,
        rates: LearningRates,
    ) -> UpdateReport {
        assert!(
            action < self.params.action_count,
            "action {action} out of range for {} actions",
            self.params.action_count
        );

        let Activations { hidden, probs, .. } = self.forward(state);
        let (h_units, a_count) = (self.params.hidden_units, self.params.action_count);

        let ratio = probs[action] / (old_prob + PROB_EPSILON);

        // The trunk gradient must use the head weights that produced `hidden`,
        // so copy them before the heads move.
        let critic_snapshot: SmallVec<[f64; INLINE_HIDDEN]> = SmallVec::from_slice(&self.params.w_hv);
        let actor_snapshot = self.params.w_ha.clone();

        let adv = advantage.clamp(-ADVANTAGE_CLIP, ADVANTAGE_CLIP);

        // Critic
        for (w, h) in self.params.w_hv.iter_mut().zip(&hidden) {
            *w += rates.critic * adv * h;
        }
        self.params.b_v += rates.critic * adv;

        let clipped = is_clipped(ratio, adv);

        // Entropy: dH/dlogit_k = -w_k + p_k * sum_j w_j, w_j = p_j (ln p_j + 1)
        let w_ent: Vec<f64> = probs
            .iter()
            .map(|&p| p * ((p + PROB_EPSILON).ln() + 1.0))
            .collect();
        let sum_w: f64 = w_ent.iter().sum();

        // Actor
        for k in 0..a_count {
            let pg = indicator(k == action) - probs[k];
            let d_entropy = -w_ent[k] + probs[k] * sum_w;
            let policy_grad = if clipped { 0.0 } else { ratio * adv * pg };
            let g = policy_grad + ENTROPY_BETA * d_entropy;
            let step = rates.actor * g;

            let row = &mut self.params.w_ha[k * h_units..(k + 1) * h_units];
            for (w, h) in row.iter_mut().zip(&hidden) {
                *w += step * h;
            }
            self.params.b_a[k] += step;
        }

        // Trunk
        let input_dim = self.params.input_dim;
        for h in 0..h_units {
            let dh_dz = 1.0 - hidden[h] * hidden[h];

            let critic_part = adv * critic_snapshot[h];

            let mut actor_sum = 0.0;
            for k in 0..a_count {
                let pg = indicator(k == action) - probs[k];
                actor_sum += pg * actor_snapshot[k * h_units + h];
            }
            let actor_part = adv * actor_sum;

            let chain = rates.trunk * (critic_part + actor_part) * dh_dz;

            let row = &mut self.params.w_ih[h * input_dim..(h + 1) * input_dim];
            for (w, x) in row.iter_mut().zip(state) {
                *w += chain * x;
            }
            self.params.b_h[h] += chain;
        }

        UpdateReport {
            advantage,
            ratio,
            clipped,
        }
    }
}

#[inline]
fn indicator(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

impl PolicyNetwork for ActorCritic {
    fn action_count(&self) -> usize {
        self.params.action_count
    }

    fn policy_probs(&self, state: &[f64]) -> Vec<f64> {
        ActorCritic::policy_probs(self, state)
    }

    fn policy_prob(&self, state: &[f64], action: usize) -> f64 {
        ActorCritic::policy_prob(self, state, action)
    }
}

impl ValueNetwork for ActorCritic {
    fn value(&self, state: &[f64]) -> f64 {
        ActorCritic::value(self, state)
    }
}
