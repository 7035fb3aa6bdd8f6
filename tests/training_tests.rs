//! Integration tests for trajectories and the episode runner.

use tiny_ppo::env::{Environment, StepResult};
use tiny_ppo::nn::{ActorCritic, IdentityEncoder, StateEncoder};
use tiny_ppo::training::{PpoConfig, Trajectory, TrajectoryRunner};
use tiny_ppo::Error;

/// Fixed two-step episode: s1 -> s2 -> terminal, independent of the action.
struct TwoStep;

const S1: [f64; 2] = [1.0, 0.0];
const S2: [f64; 2] = [0.0, 1.0];
const S3: [f64; 2] = [0.5, 0.5];
const R1: f64 = 0.5;
const R2: f64 = -1.0;

impl Environment for TwoStep {
    type State = Vec<f64>;

    fn action_count(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Vec<f64> {
        S1.to_vec()
    }

    fn step(&mut self, state: &Vec<f64>, _action: usize) -> StepResult<Vec<f64>> {
        if state.as_slice() == S1 {
            StepResult::new(S2.to_vec(), R1, false)
        } else {
            StepResult::new(S3.to_vec(), R2, true)
        }
    }
}

/// Never terminates.
struct Endless;

impl Environment for Endless {
    type State = Vec<f64>;

    fn action_count(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Vec<f64> {
        vec![0.0, 0.0]
    }

    fn step(&mut self, state: &Vec<f64>, action: usize) -> StepResult<Vec<f64>> {
        let x = (state[0] + 0.01).min(1.0);
        StepResult::new(vec![x, action as f64], 0.1, false)
    }
}

fn runner(seed: u64, config: PpoConfig) -> TrajectoryRunner<IdentityEncoder> {
    let network = ActorCritic::new(2, 6, 2, Some(seed)).unwrap();
    TrajectoryRunner::new(network, IdentityEncoder::new(2), config).unwrap()
}

// =============================================================================
// Advantages
// =============================================================================

#[test]
fn test_two_step_advantages() {
    let gamma = 0.99;
    let mut r = runner(3, PpoConfig::default().with_gamma(gamma));
    let mut trajectory = r.rollout(&mut TwoStep).unwrap().trajectory;
    assert_eq!(trajectory.len(), 2);

    let critic = r.network().clone();
    r.train_on(&mut trajectory);

    let v1 = critic.value(&S1);
    let v2 = critic.value(&S2);
    let t = trajectory.transitions();

    assert_eq!(t[0].advantage, R1 + gamma * v2 - v1);
    assert_eq!(t[0].return_target, R1 + gamma * v2);
    assert_eq!(t[1].advantage, R2 + gamma * 0.0 - v2);
    assert_eq!(t[1].return_target, R2 + gamma * 0.0);
}

#[test]
fn test_advantages_use_one_critic_snapshot() {
    let mut r = runner(8, PpoConfig::default());
    let mut trajectory = r.rollout(&mut Endless).unwrap().trajectory;
    trajectory = Trajectory::from_iter(trajectory.transitions()[..20].iter().cloned());

    let mut expected = trajectory.clone();
    expected.compute_advantages(r.network(), 0.99);

    r.train_on(&mut trajectory);

    let got: Vec<f64> = trajectory.iter().map(|t| t.advantage).collect();
    let want: Vec<f64> = expected.iter().map(|t| t.advantage).collect();
    assert_eq!(got, want);
}

// =============================================================================
// Epoch Loop
// =============================================================================

#[test]
fn test_epochs_replay_transitions_in_order() {
    let config = PpoConfig::default().with_epochs(3);
    let rates = config.learning_rates();
    let mut r = runner(12, config);

    let mut trajectory = r.rollout(&mut TwoStep).unwrap().trajectory;

    // Replay by hand on a copy of the network.
    let mut manual = r.network().clone();
    let mut expected = trajectory.clone();
    expected.compute_advantages(&manual, 0.99);
    for _ in 0..3 {
        for t in expected.iter() {
            manual.update(&t.state, t.action, t.old_prob, t.advantage, rates);
        }
    }

    let clipped = r.train_on(&mut trajectory);
    assert_eq!(clipped.len(), 3);
    assert_eq!(r.network().parameters(), manual.parameters());
}

#[test]
fn test_first_epoch_is_never_clipped() {
    let mut r = runner(4, PpoConfig::default().with_max_steps(1));
    let outcome = r.run_episode(&mut TwoStep).unwrap();

    // A single transition evaluated on-policy has ratio ~1.
    assert_eq!(outcome.steps, 1);
    assert_eq!(outcome.clipped_per_epoch[0], 0);
}

// =============================================================================
// Episode Boundaries
// =============================================================================

#[test]
fn test_step_cap() {
    let mut r = runner(1, PpoConfig::default());
    let outcome = r.run_episode(&mut Endless).unwrap();

    assert_eq!(outcome.steps, 999);
    assert!(outcome.truncated);
    assert_eq!(outcome.action_counts.iter().sum::<usize>(), 999);
    assert!((outcome.total_reward - 99.9).abs() < 1e-9);
}

#[test]
fn test_truncated_last_transition_bootstraps() {
    let mut r = runner(1, PpoConfig::default().with_max_steps(10));
    let rollout = r.rollout(&mut Endless).unwrap();
    let last = rollout.trajectory.transitions().last().unwrap().clone();
    assert!(!last.done);

    let mut trajectory = rollout.trajectory;
    let critic = r.network().clone();
    trajectory.compute_advantages(&critic, 0.99);

    let last = trajectory.transitions().last().unwrap();
    assert_eq!(last.return_target, last.reward + 0.99 * critic.value(&last.next_state));
}

#[test]
fn test_same_seed_same_training() {
    let mut a = runner(42, PpoConfig::default());
    let mut b = runner(42, PpoConfig::default());

    for _ in 0..5 {
        let oa = a.run_episode(&mut TwoStep).unwrap();
        let ob = b.run_episode(&mut TwoStep).unwrap();
        assert_eq!(oa.action_counts, ob.action_counts);
        assert_eq!(oa.clipped_per_epoch, ob.clipped_per_epoch);
    }
    assert_eq!(a.network().parameters(), b.network().parameters());
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_runner_rejects_mismatched_encoder() {
    let network = ActorCritic::new(3, 6, 2, Some(0)).unwrap();
    let encoder = IdentityEncoder::new(2);
    assert_eq!(encoder.feature_count(), 2);

    let err = TrajectoryRunner::new(network, encoder, PpoConfig::default()).err();
    assert_eq!(err, Some(Error::InputDimMismatch { encoder: 2, network: 3 }));
}

#[test]
fn test_rollout_rejects_action_count_mismatch() {
    let network = ActorCritic::new(2, 6, 3, Some(0)).unwrap();
    let mut r = TrajectoryRunner::new(network, IdentityEncoder::new(2), PpoConfig::default()).unwrap();
    assert!(matches!(
        r.rollout(&mut TwoStep),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn test_bad_state_width_surfaces_encoder_error() {
    struct Wide;

    impl Environment for Wide {
        type State = Vec<f64>;

        fn action_count(&self) -> usize {
            2
        }

        fn reset(&mut self) -> Vec<f64> {
            vec![0.0; 3]
        }

        fn step(&mut self, state: &Vec<f64>, _action: usize) -> StepResult<Vec<f64>> {
            StepResult::new(state.clone(), 0.0, true)
        }
    }

    let mut r = runner(0, PpoConfig::default());
    assert!(matches!(
        r.run_episode(&mut Wide),
        Err(Error::FeatureCountMismatch { declared: 2, produced: 3 })
    ));
}
