//! Policy and value traits.
//!
//! These define the read-only inference surface the training code relies on.
//! `ActorCritic` implements both; `ZeroValue` isolates the advantage pass
//! from a learned critic.

/// Policy network outputs action probabilities for a feature vector.
pub trait PolicyNetwork {
    /// Size of the action space.
    fn action_count(&self) -> usize;

    /// Full probability distribution over actions (sums to 1.0).
    fn policy_probs(&self, state: &[f64]) -> Vec<f64>;

    /// Probability of a single action.
    fn policy_prob(&self, state: &[f64], action: usize) -> f64 {
        self.policy_probs(state)[action]
    }
}

/// Value network outputs a scalar state-value estimate.
pub trait ValueNetwork {
    /// Estimate the value of the given state.
    fn value(&self, state: &[f64]) -> f64;
}

/// Critic that predicts zero everywhere, so advantages equal raw rewards.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroValue;

impl ValueNetwork for ZeroValue {
    fn value(&self, _state: &[f64]) -> f64 {
        0.0
    }
}
