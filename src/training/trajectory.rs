//! Trajectory buffer for one episode.
//!
//! A trajectory records every step of an episode:
//! - Encoded state and next state
//! - Action taken and its probability under the behavior policy
//! - Reward and terminal flag
//!
//! Advantages and return targets are filled in once, after the episode,
//! from a single frozen critic pass.

use serde::{Deserialize, Serialize};

use crate::nn::ValueNetwork;

/// A single step in a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Encoded state the action was chosen in.
    pub state: Vec<f64>,

    /// The action that was taken.
    pub action: usize,

    /// Probability of `action` under the policy that sampled it.
    pub old_prob: f64,

    /// Immediate reward.
    pub reward: f64,

    /// Encoded state after the action.
    pub next_state: Vec<f64>,

    /// True when the environment ended the episode on this step.
    pub done: bool,

    /// `reward + gamma * V(next) - V(state)`, set by the advantage pass.
    pub advantage: f64,

    /// `reward + gamma * V(next)`, set by the advantage pass.
    pub return_target: f64,
}

impl Transition {
    /// Create a transition with advantage and return target still unset.
    pub fn new(
        state: Vec<f64>,
        action: usize,
        old_prob: f64,
        reward: f64,
        next_state: Vec<f64>,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            old_prob,
            reward,
            next_state,
            done,
            advantage: 0.0,
            return_target: 0.0,
        }
    }
}

/// Ordered transitions of one episode.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    transitions: Vec<Transition>,
    total_reward: f64,
}

impl Trajectory {
    /// Create an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transition.
    pub fn push(&mut self, transition: Transition) {
        self.total_reward += transition.reward;
        self.transitions.push(transition);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if trajectory is empty.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Sum of rewards over the episode.
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Transitions in recorded order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Iterate transitions in recorded order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// One-step TD advantages from a single critic snapshot.
    ///
    /// Every transition is evaluated against the same parameters; terminal
    /// transitions bootstrap from zero.
    pub fn compute_advantages<V: ValueNetwork + ?Sized>(&mut self, critic: &V, gamma: f64) {
        for t in &mut self.transitions {
            let v_s = critic.value(&t.state);
            let v_next = if t.done { 0.0 } else { critic.value(&t.next_state) };

            t.advantage = t.reward + gamma * v_next - v_s;
            t.return_target = t.reward + gamma * v_next;
        }
    }
}

impl FromIterator<Transition> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        let mut trajectory = Trajectory::new();
        for t in iter {
            trajectory.push(t);
        }
        trajectory
    }
}
