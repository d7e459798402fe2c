//! Test utilities for Overwatch development.
//!
//! Provides a [`GridBuilder`] for laying out agents and obstacles on a
//! small map, and the policy fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use overwatch_agents::AgentLayer;
use overwatch_core::{AgentGroup, Position};
use overwatch_space::{GridState, Layer, ObstacleMap};

pub use fixtures::{CountingPolicy, ScriptedPolicy};

/// An obstacle-free `xs × ys` map.
pub fn open_map(xs: u32, ys: u32) -> Arc<ObstacleMap> {
    Arc::new(ObstacleMap::open(xs, ys).expect("test map dimensions must be nonzero"))
}

/// Builder for a map plus agent positions per group.
///
/// ```
/// use overwatch_test_utils::GridBuilder;
/// use overwatch_space::Layer;
/// use overwatch_core::Position;
///
/// let grid = GridBuilder::open(5, 5)
///     .target((2, 2))
///     .snipers(&[(1, 2), (3, 2)])
///     .grid();
/// assert_eq!(grid.occupancy(Layer::Snipers, Position::new(1, 2)), 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct GridBuilder {
    map: ObstacleMap,
    surveillance: Vec<Position>,
    snipers: Vec<Position>,
    targets: Vec<Position>,
}

impl GridBuilder {
    /// Start from an obstacle-free map.
    pub fn open(xs: u32, ys: u32) -> Self {
        Self::from_map(ObstacleMap::open(xs, ys).expect("test map dimensions must be nonzero"))
    }

    /// Start from an ASCII map (see [`ObstacleMap::from_ascii`]).
    pub fn ascii(rows: &[&str]) -> Self {
        Self::from_map(ObstacleMap::from_ascii(rows).expect("test map must parse"))
    }

    pub fn from_map(map: ObstacleMap) -> Self {
        Self {
            map,
            surveillance: Vec::new(),
            snipers: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn obstacle(mut self, pos: impl Into<Position>) -> Self {
        self.map = self
            .map
            .with_obstacle(pos.into())
            .expect("obstacle must be on the map");
        self
    }

    pub fn surveillance(mut self, pos: impl Into<Position>) -> Self {
        self.surveillance.push(pos.into());
        self
    }

    pub fn sniper(mut self, pos: impl Into<Position>) -> Self {
        self.snipers.push(pos.into());
        self
    }

    pub fn snipers(mut self, positions: &[(i32, i32)]) -> Self {
        self.snipers.extend(positions.iter().map(|&p| Position::from(p)));
        self
    }

    pub fn target(mut self, pos: impl Into<Position>) -> Self {
        self.targets.push(pos.into());
        self
    }

    /// The map built so far.
    pub fn map(&self) -> Arc<ObstacleMap> {
        Arc::new(self.map.clone())
    }

    /// Agent layer for `group`, agents in insertion order.
    pub fn layer(&self, group: AgentGroup) -> AgentLayer {
        let positions = match group {
            AgentGroup::Surveillance => &self.surveillance,
            AgentGroup::Sniper => &self.snipers,
            AgentGroup::Target => &self.targets,
        };
        AgentLayer::new(group, 0, self.map(), positions.clone())
            .expect("fixture agents must stand on free cells")
    }

    /// Surveillance, sniper and target layers.
    pub fn layers(&self) -> [AgentLayer; 3] {
        [
            self.layer(AgentGroup::Surveillance),
            self.layer(AgentGroup::Sniper),
            self.layer(AgentGroup::Target),
        ]
    }

    /// Grid state with the obstacle layer and all three occupancy layers.
    pub fn grid(&self) -> GridState {
        let mut grid = GridState::from_map(&self.map);
        for layer in self.layers() {
            grid.refresh(Layer::for_group(layer.group()), &layer.state_matrix())
                .expect("fixture layers share the map dims");
        }
        grid
    }
}
