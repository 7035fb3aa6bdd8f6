//! Integration tests for the combat environment and its trainer.

use tiny_ppo::core::TrainRng;
use tiny_ppo::env::Environment;
use tiny_ppo::games::combat::{
    CombatAction, CombatConfig, CombatEncoder, CombatEnv, CombatState, CombatTrainer,
    EpisodeStats, TrainerConfig, DEATH_REWARD, KILL_REWARD, STAND_IN_COMBAT_REWARD,
};
use tiny_ppo::nn::{ActorCritic, StateEncoder};
use tiny_ppo::training::{PpoConfig, TrajectoryRunner};

fn combat_runner(seed: u64, config: PpoConfig) -> (TrajectoryRunner<CombatEncoder>, CombatEnv) {
    let master = TrainRng::new(seed);
    let encoder = CombatEncoder::default();
    let network =
        ActorCritic::with_rng(encoder.feature_count(), 16, 2, master.for_context("network")).unwrap();
    let env = CombatEnv::new(CombatConfig::default(), master.for_context("environment")).unwrap();
    (TrajectoryRunner::new(network, encoder, config).unwrap(), env)
}

// =============================================================================
// Environment
// =============================================================================

#[test]
fn test_random_play_keeps_features_in_range() {
    let mut env = CombatEnv::new(CombatConfig::default(), TrainRng::new(17)).unwrap();
    let encoder = CombatEncoder::default();
    let mut dice = TrainRng::new(18);

    let mut state = env.reset();
    for _ in 0..20_000 {
        let features = encoder.encode(&state).unwrap();
        assert_eq!(features.len(), 17);
        assert!(features.iter().all(|f| (-1.0..=1.0).contains(f)), "{features:?}");

        let result = env.step(&state, dice.gen_range_usize(0..2));
        state = if result.done { env.reset() } else { result.state };
    }
}

#[test]
fn test_rewards_come_from_known_events() {
    let mut env = CombatEnv::new(CombatConfig::default(), TrainRng::new(2)).unwrap();
    let mut state = env.reset();

    for i in 0..10_000 {
        let action = if i % 4 == 0 {
            CombatAction::Stand
        } else {
            CombatAction::Attack
        };
        let result = env.step(&state, action.index());
        let next = &result.state;

        let kills = f64::from(next.kills - state.kills);
        let deaths = f64::from(next.deaths - state.deaths);
        let stood_in_combat = action == CombatAction::Stand && state.in_combat;
        let expected = kills * KILL_REWARD
            + deaths * DEATH_REWARD
            + if stood_in_combat { STAND_IN_COMBAT_REWARD } else { 0.0 };
        assert!((result.reward - expected).abs() < 1e-12);

        state = if result.done { env.reset() } else { result.state };
    }
}

#[test]
fn test_attacking_always_eventually_ends() {
    let mut env = CombatEnv::new(CombatConfig::default(), TrainRng::new(9)).unwrap();
    let mut state = env.reset();

    let mut steps = 0;
    loop {
        let result = env.step(&state, CombatAction::Attack.index());
        steps += 1;
        if result.done {
            let end = &result.state;
            assert!(end.kills == 30 || end.deaths == 30);
            break;
        }
        state = result.state;
        assert!(steps < 100_000, "episode never ended");
    }
}

#[test]
fn test_input_state_is_not_mutated() {
    let mut env = CombatEnv::new(CombatConfig::default(), TrainRng::new(1)).unwrap();
    let state = CombatState {
        in_combat: true,
        current_hp: 4,
        ..CombatState::default()
    };
    let copy = state.clone();
    for action in 0..2 {
        env.step(&state, action);
        assert_eq!(state, copy);
    }
}

// =============================================================================
// Training
// =============================================================================

#[test]
fn test_episode_stats_are_consistent() {
    let (mut runner, mut env) = combat_runner(5, PpoConfig::default());

    for _ in 0..3 {
        let outcome = runner.run_episode(&mut env).unwrap();
        let stats = EpisodeStats::from_outcome(&outcome, env.counters());

        assert_eq!(stats.stand_count + stats.attack_count, stats.steps);
        assert!(stats.steps as usize <= 999);
        assert!(stats.failed_stands <= stats.end_deaths);
        assert!(stats.hp_regenerated_from_stand <= stats.stand_count);
        if !stats.truncated {
            assert!(stats.end_kills == 30 || stats.end_deaths == 30);
        }
    }
}

#[test]
fn test_trainer_is_reproducible() {
    let config = TrainerConfig::new()
        .with_episodes(6)
        .with_log_every(3)
        .with_hidden_units(8)
        .with_seed(99);

    let a = CombatTrainer::new(config.clone()).unwrap().run().unwrap();
    let b = CombatTrainer::new(config.clone()).unwrap().run().unwrap();
    assert_eq!(a.reports, b.reports);
    assert_eq!(a.network.parameters(), b.network.parameters());

    let c = CombatTrainer::new(config.with_seed(100)).unwrap().run().unwrap();
    assert_ne!(a.network.parameters(), c.network.parameters());
}

#[test]
fn test_trainer_summary() {
    let config = TrainerConfig::new()
        .with_episodes(5)
        .with_log_every(2)
        .with_hidden_units(4)
        .with_combat(CombatConfig::new().with_limits(2, 2));

    let summary = CombatTrainer::new(config).unwrap().run().unwrap();

    // Episode 5 does not complete a window.
    assert_eq!(summary.episodes, 5);
    assert_eq!(summary.reports.len(), 2);
    let mean = (summary.reports[0].avg_reward + summary.reports[1].avg_reward) / 2.0;
    assert!((summary.mean_window_reward - mean).abs() < 1e-12);
    assert_eq!(summary.network.input_dim(), 17);
}
