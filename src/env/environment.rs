//! Environment trait.

/// Outcome of applying one action.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult<S> {
    /// State after the action.
    pub state: S,
    /// Immediate reward.
    pub reward: f64,
    /// Terminal flag owned by the environment (win/loss).
    pub done: bool,
}

impl<S> StepResult<S> {
    pub fn new(state: S, reward: f64, done: bool) -> Self {
        Self { state, reward, done }
    }
}

/// Environment trait.
///
/// ## Implementation Notes
///
/// - `step` must not mutate its input state; it returns a new one
/// - Environments may own their own RNG; draws made during `step` are the
///   only source of nondeterminism
/// - `done` signals a true terminal state. Step limits are enforced by the
///   caller and do not set `done`
pub trait Environment {
    /// Domain state.
    type State: Clone;

    /// Number of discrete actions.
    fn action_count(&self) -> usize;

    /// Start a new episode and return its initial state.
    fn reset(&mut self) -> Self::State;

    /// Apply `action` to `state`.
    fn step(&mut self, state: &Self::State, action: usize) -> StepResult<Self::State>;
}
