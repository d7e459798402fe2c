//! Benchmark profiles and utilities for the Overwatch gridworld.
//!
//! - [`reference_config`]: 32x32 map, 8 surveillance agents, 16 snipers, 8 targets
//! - [`stress_config`]: 128x128 map with 10x the agents
//! - [`pillar_map`]: deterministic obstacle layout for both profiles
//! - [`capture_rings`]: targets each boxed in by four snipers

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;

use overwatch_agents::Placement;
use overwatch_core::Position;
use overwatch_engine::{EnvConfig, SniperEnv, SniperEnvBuilder};
use overwatch_space::{GridError, ObstacleMap};

/// Reference profile: 8 surveillance agents, 16 snipers and 8 targets
/// with 7x7 windows, meant for a 32x32 [`pillar_map`].
pub fn reference_config(seed: u64) -> EnvConfig {
    EnvConfig {
        n_surveillance: 8,
        n_snipers: 16,
        n_targets: 8,
        obs_range: 7,
        seed,
        ..EnvConfig::default()
    }
}

/// Stress profile: 80 surveillance agents, 160 snipers and 80 targets,
/// meant for a 128x128 [`pillar_map`].
pub fn stress_config(seed: u64) -> EnvConfig {
    EnvConfig {
        n_surveillance: 80,
        n_snipers: 160,
        n_targets: 80,
        obs_range: 9,
        seed,
        ..EnvConfig::default()
    }
}

/// A `side × side` map with a 2x2 pillar every eight cells.
pub fn pillar_map(side: u32) -> Result<ObstacleMap, GridError> {
    let mut map = ObstacleMap::open(side, side)?;
    let side = side as i32;
    for x in (4..side - 1).step_by(8) {
        for y in (4..side - 1).step_by(8) {
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                map = map.with_obstacle(Position::new(x + dx, y + dy))?;
            }
        }
    }
    Ok(map)
}

/// Build an environment on a pillar map of the given side length.
pub fn build_env(config: EnvConfig, side: u32) -> Result<SniperEnv, Box<dyn Error>> {
    let map = pillar_map(side)?;
    Ok(SniperEnvBuilder::new(config).map(map).build()?)
}

/// `n` targets on an open map of side `side`, each with a sniper on all
/// four sides. Returns `(targets, snipers)` as fixed placements.
///
/// Targets sit on a stride-3 lattice starting at (1, 1), so rings never
/// overlap. Fewer than `n` targets are returned when the map is full.
pub fn capture_rings(side: u32, n: usize) -> (Placement, Placement) {
    let side = side as i32;
    let mut targets = Vec::with_capacity(n);
    let mut snipers = Vec::with_capacity(4 * n);
    'fill: for x in (1..side - 1).step_by(3) {
        for y in (1..side - 1).step_by(3) {
            if targets.len() == n {
                break 'fill;
            }
            let t = Position::new(x, y);
            targets.push(t);
            snipers.extend([t.offset(-1, 0), t.offset(1, 0), t.offset(0, 1), t.offset(0, -1)]);
        }
    }
    (Placement::Fixed(targets), Placement::Fixed(snipers))
}
