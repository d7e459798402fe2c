//! Integration test: curriculum updates across resets.

use overwatch_core::AgentGroup;
use overwatch_engine::{EnvConfig, SniperEnvBuilder};
use overwatch_space::ObstacleMap;

#[test]
fn threat_shrinks_to_floor_of_four_snipers() {
    let mut env = SniperEnvBuilder::new(EnvConfig {
        n_snipers: 7,
        n_targets: 7,
        curriculum_remove_every: 100,
        ..EnvConfig::default()
    })
    .map(ObstacleMap::open(10, 10).unwrap())
    .build()
    .unwrap();

    let mut shrinks = 0;
    for itr in 0..=1000 {
        if env.update_curriculum(itr).shrunk {
            shrinks += 1;
        }
    }
    assert_eq!(shrinks, 3);
    env.reset().unwrap();
    assert_eq!(env.agents(AgentGroup::Sniper).n_agents(), 4);
    assert_eq!(env.agents(AgentGroup::Target).n_agents(), 4);
}

#[test]
fn constraint_window_grows_to_one() {
    let mut env = SniperEnvBuilder::new(EnvConfig {
        constraint_window: 0.0,
        curriculum_constrain_rate: 0.25,
        ..EnvConfig::default()
    })
    .map(ObstacleMap::open(5, 5).unwrap())
    .build()
    .unwrap();
    assert_eq!(env.constraint_window(), 0.0);
    env.update_curriculum(1);
    assert_eq!(env.constraint_window(), 0.25);
    for itr in 2..10 {
        env.update_curriculum(itr);
    }
    assert_eq!(env.constraint_window(), 1.0);
}

#[test]
fn shaping_cutoff_zeroes_target_bonus() {
    let mut env = SniperEnvBuilder::new(EnvConfig {
        target_bonus: 0.5,
        curriculum_turn_off_shaping: Some(3),
        ..EnvConfig::default()
    })
    .map(ObstacleMap::open(5, 5).unwrap())
    .build()
    .unwrap();
    env.update_curriculum(3);
    assert_eq!(env.reward_evaluator().target_bonus(), 0.5);
    env.update_curriculum(4);
    assert_eq!(env.reward_evaluator().target_bonus(), 0.0);
    assert_eq!(env.config().target_bonus, 0.0);
}
