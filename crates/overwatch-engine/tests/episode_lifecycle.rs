//! Integration test: reset/step state machine, determinism, and the
//! zero-threat round trip.

use overwatch_agents::{Direction, Placement, StationaryPolicy};
use overwatch_core::{ActionError, AgentGroup, Position, StepError, TickId};
use overwatch_engine::{
    Actions, EnvConfig, EnvState, SniperEnv, SniperEnvBuilder, StepLimit,
};
use overwatch_rules::RewardMech;
use overwatch_space::ObstacleMap;
use overwatch_test_utils::ScriptedPolicy;

fn env(config: EnvConfig) -> SniperEnv {
    SniperEnvBuilder::new(config)
        .map(ObstacleMap::open(7, 7).unwrap())
        .build()
        .unwrap()
}

fn stay_all(n: usize) -> Vec<usize> {
    vec![Direction::Stay.index(); n]
}

// ── State machine ────────────────────────────────────────────────

#[test]
fn step_before_reset_is_rejected() {
    let mut env = env(EnvConfig::default());
    assert_eq!(env.step(stay_all(1)).unwrap_err(), StepError::NotReady);
}

#[test]
fn terminal_episode_needs_reset() {
    let mut env = SniperEnvBuilder::new(EnvConfig::default())
        .map(ObstacleMap::open(7, 7).unwrap())
        .termination(StepLimit(2))
        .build()
        .unwrap();
    env.reset().unwrap();
    assert!(!env.step(stay_all(1)).unwrap().done);
    assert_eq!(env.state(), EnvState::Stepped);
    assert!(env.step(stay_all(1)).unwrap().done);
    assert_eq!(env.state(), EnvState::Terminal);
    assert_eq!(env.step(stay_all(1)).unwrap_err(), StepError::Terminal);

    env.reset().unwrap();
    assert_eq!(env.state(), EnvState::Ready);
    assert_eq!(env.current_tick(), TickId(0));
    assert!(env.step(stay_all(1)).is_ok());
}

#[test]
fn default_termination_never_fires() {
    let mut env = env(EnvConfig::default());
    env.reset().unwrap();
    for _ in 0..50 {
        assert!(!env.step(stay_all(1)).unwrap().done);
    }
    assert_eq!(env.current_tick(), TickId(50));
}

// ── Round trip ───────────────────────────────────────────────────

#[test]
fn no_threats_reward_is_exactly_urgency() {
    for mech in [RewardMech::Global, RewardMech::Local] {
        let mut env = env(EnvConfig {
            n_surveillance: 3,
            n_snipers: 0,
            n_targets: 0,
            urgency_reward: -0.25,
            reward_mech: mech,
            ..EnvConfig::default()
        });
        env.reset().unwrap();
        let out = env.step(stay_all(3)).unwrap();
        let expected = match mech {
            RewardMech::Global => vec![-0.25],
            RewardMech::Local => vec![-0.25; 3],
        };
        assert_eq!(out.rewards, expected);
        assert_eq!(out.observations.len(), 3);
    }
}

#[test]
fn joint_action_matches_per_agent_list() {
    let config = EnvConfig {
        n_surveillance: 2,
        n_snipers: 0,
        n_targets: 0,
        surveillance_placement: Placement::Fixed(vec![Position::new(3, 3), Position::new(3, 3)]),
        ..EnvConfig::default()
    };
    let mut a = env(config.clone());
    let mut b = env(config);
    a.reset().unwrap();
    b.reset().unwrap();
    assert_eq!(a.joint_action_space(), 25);

    // East for agent 0, north for agent 1: 1 * 5 + 2.
    a.step(Actions::Joint(7)).unwrap();
    b.step(vec![Direction::East.index(), Direction::North.index()]).unwrap();
    let surv = |e: &SniperEnv, i| e.agents(AgentGroup::Surveillance).position(i);
    assert_eq!(surv(&a, 0), Some(Position::new(4, 3)));
    assert_eq!(surv(&a, 1), Some(Position::new(3, 4)));
    assert_eq!(surv(&a, 0), surv(&b, 0));
    assert_eq!(surv(&a, 1), surv(&b, 1));
}

#[test]
fn joint_action_out_of_range_is_rejected() {
    let mut env = env(EnvConfig {
        n_surveillance: 2,
        ..EnvConfig::default()
    });
    env.reset().unwrap();
    assert!(matches!(
        env.step(Actions::Joint(25)),
        Err(StepError::InvalidAction(_))
    ));
}

// ── Determinism ──────────────────────────────────────────────────

fn rollout(seed: u64) -> Vec<(Vec<Vec<f32>>, Vec<f32>)> {
    let mut env = env(EnvConfig {
        n_surveillance: 2,
        n_snipers: 5,
        n_targets: 3,
        seed,
        ..EnvConfig::default()
    });
    let mut trace = vec![(env.reset().unwrap(), Vec::new())];
    for t in 0..30 {
        let out = env.step(vec![t % 5, (t + 2) % 5]).unwrap();
        trace.push((out.observations, out.rewards));
    }
    trace
}

#[test]
fn same_seed_same_trajectory() {
    assert_eq!(rollout(42), rollout(42));
}

#[test]
fn reset_with_seed_replays_episode() {
    let mut env = env(EnvConfig {
        n_snipers: 4,
        n_targets: 4,
        ..EnvConfig::default()
    });
    let first = env.reset_with_seed(9).unwrap();
    let step_a = env.step(stay_all(1)).unwrap();
    let again = env.reset_with_seed(9).unwrap();
    let step_b = env.step(stay_all(1)).unwrap();
    assert_eq!(first, again);
    assert_eq!(step_a.observations, step_b.observations);
    assert_eq!(env.seed(), 9);
}

#[test]
fn rejected_policy_action_leaves_trajectory_intact() {
    let config = EnvConfig {
        n_snipers: 4,
        n_targets: 1,
        seed: 17,
        ..EnvConfig::default()
    };
    let build = |builder: SniperEnvBuilder| {
        builder
            .map(ObstacleMap::open(7, 7).unwrap())
            .build()
            .unwrap()
    };
    // Snipers draw from the RNG before the bad target action surfaces.
    let mut faulty = build(
        SniperEnvBuilder::new(config.clone()).target_policy(ScriptedPolicy::new([9])),
    );
    let mut clean =
        build(SniperEnvBuilder::new(config).target_policy(StationaryPolicy));
    assert_eq!(faulty.reset().unwrap(), clean.reset().unwrap());

    assert_eq!(
        faulty.step(stay_all(1)).unwrap_err(),
        StepError::InvalidAction(ActionError::InvalidAction {
            agent: 0,
            action: 9,
            n_actions: 5,
        })
    );
    assert_eq!(faulty.current_tick(), TickId(0));

    for _ in 0..10 {
        let a = faulty.step(stay_all(1)).unwrap();
        let b = clean.step(stay_all(1)).unwrap();
        assert_eq!(a.observations, b.observations);
        assert_eq!(a.rewards, b.rewards);
        let snipers = |env: &SniperEnv| -> Vec<Position> {
            env.agents(AgentGroup::Sniper).live_positions().collect()
        };
        assert_eq!(snipers(&faulty), snipers(&clean));
    }
}

// ── Map pool ─────────────────────────────────────────────────────

#[test]
fn sample_maps_draws_from_whole_pool() {
    let walled = ObstacleMap::from_ascii(&[".......", ".#####.", ".......", ".......", ".......", ".......", "......."])
        .unwrap();
    let mut env = SniperEnvBuilder::new(EnvConfig {
        sample_maps: true,
        ..EnvConfig::default()
    })
    .maps([ObstacleMap::open(7, 7).unwrap(), walled])
    .build()
    .unwrap();
    let mut seen = [false; 2];
    for _ in 0..64 {
        env.reset().unwrap();
        seen[env.map_index()] = true;
    }
    assert_eq!(seen, [true, true]);
}

#[test]
fn pinned_map_without_sampling() {
    let mut env = SniperEnvBuilder::new(EnvConfig::default())
        .maps([ObstacleMap::open(7, 7).unwrap(), ObstacleMap::open(7, 7).unwrap()])
        .sniper_policy(StationaryPolicy)
        .build()
        .unwrap();
    for _ in 0..8 {
        env.reset().unwrap();
        assert_eq!(env.map_index(), 0);
    }
}

#[test]
fn observation_shape_follows_layout() {
    let mut flat = env(EnvConfig::default());
    assert_eq!(flat.observation_space().len(), 37);
    assert_eq!(flat.reset().unwrap()[0].len(), 37);

    let mut windows = env(EnvConfig {
        flatten: false,
        obs_range: 5,
        ..EnvConfig::default()
    });
    assert_eq!(windows.observation_space().dims(), vec![5, 5, 5]);
    assert_eq!(windows.reset().unwrap()[0].len(), 125);
    assert_eq!(windows.action_space(), 5);
}
