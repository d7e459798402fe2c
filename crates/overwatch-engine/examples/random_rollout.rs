//! Random rollout of the surveillance environment.
//!
//! Builds an environment on a small walled map, drives the surveillance
//! agents with uniformly random actions, and prints per-episode totals.
//!
//! Run with:
//!   RUST_LOG=overwatch_engine=debug cargo run -p overwatch-engine --example random_rollout

use overwatch_engine::{AllTargetsCaptured, EnvConfig, SniperEnvBuilder};
use overwatch_rules::RewardMech;
use overwatch_space::ObstacleMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

const EPISODES: usize = 3;
const MAX_STEPS: usize = 200;

const MAP: [&str; 10] = [
    "..........",
    "..........",
    "..###.....",
    "..........",
    ".......#..",
    ".......#..",
    "..........",
    "....##....",
    "..........",
    "..........",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = EnvConfig {
        n_surveillance: 3,
        n_snipers: 8,
        n_targets: 4,
        obs_range: 5,
        reward_mech: RewardMech::Local,
        urgency_reward: -0.01,
        seed: 7,
        ..EnvConfig::default()
    };
    let mut env = SniperEnvBuilder::new(config)
        .map(ObstacleMap::from_ascii(&MAP)?)
        .termination(AllTargetsCaptured)
        .build()?;
    let mut actor = ChaCha8Rng::seed_from_u64(11);

    println!("observation space: {:?}", env.observation_space().dims());
    for episode in 0..EPISODES {
        env.reset()?;
        let mut totals = vec![0.0f32; env.act_dims().len()];
        let mut steps = 0;
        for _ in 0..MAX_STEPS {
            let actions: Vec<usize> = env
                .act_dims()
                .iter()
                .map(|&n| actor.gen_range(0..n))
                .collect();
            let out = env.step(actions)?;
            for (total, r) in totals.iter_mut().zip(&out.rewards) {
                *total += r;
            }
            steps += 1;
            if out.done {
                break;
            }
        }
        println!(
            "episode {episode}: {steps} steps, {} captures, returns {totals:?}, last step {} µs",
            env.captured_total(),
            env.last_metrics().total_us,
        );
    }
    Ok(())
}
