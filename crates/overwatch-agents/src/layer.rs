//! Per-group agent position layer.

use crate::action::Direction;
use crate::placement::{Placement, PlacementError};
use overwatch_core::{AgentGroup, AgentHandle, Position};
use overwatch_space::{GridDims, ObstacleMap};
use rand::RngCore;
use std::sync::Arc;

#[derive(Clone, Debug)]
struct AgentSlot {
    handle: AgentHandle,
    position: Position,
    removed: bool,
}

/// Positions of every agent in one group.
///
/// Agents are addressed by index `0..n_agents()` in spawn order. Removal
/// happens in two phases: [`mark_removed`](Self::mark_removed) tombstones
/// a slot (it stops moving and stops counting in
/// [`state_matrix`](Self::state_matrix), but indices stay stable), and
/// [`compact`](Self::compact) later drops every tombstone and shifts the
/// survivors down. [`AgentHandle`]s identify agents across compaction.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use overwatch_agents::{AgentLayer, Direction};
/// use overwatch_core::{AgentGroup, Position};
/// use overwatch_space::ObstacleMap;
///
/// let map = Arc::new(ObstacleMap::open(3, 3).unwrap());
/// let mut layer = AgentLayer::new(
///     AgentGroup::Target, 0, map, vec![Position::new(0, 0), Position::new(2, 2)],
/// ).unwrap();
///
/// // Off-grid moves are blocked.
/// assert_eq!(layer.move_agent(0, Direction::West), Some(Position::new(0, 0)));
///
/// let first = layer.handle(0).unwrap();
/// layer.mark_removed(first);
/// assert_eq!(layer.n_live(), 1);
/// assert_eq!(layer.compact(), vec![first]);
/// assert_eq!(layer.position(0), Some(Position::new(2, 2)));
/// ```
#[derive(Clone, Debug)]
pub struct AgentLayer {
    group: AgentGroup,
    episode: u32,
    map: Arc<ObstacleMap>,
    slots: Vec<AgentSlot>,
}

impl AgentLayer {
    /// Create a layer with one agent per entry of `positions`.
    ///
    /// Every position must be a free cell of `map`.
    pub fn new(
        group: AgentGroup,
        episode: u32,
        map: Arc<ObstacleMap>,
        positions: Vec<Position>,
    ) -> Result<Self, PlacementError> {
        if let Some(&position) = positions.iter().find(|p| !map.is_free(**p)) {
            return Err(PlacementError::Blocked { position });
        }
        let slots = positions
            .into_iter()
            .enumerate()
            .map(|(serial, position)| AgentSlot {
                handle: AgentHandle::new(group, episode, serial as u32),
                position,
                removed: false,
            })
            .collect();
        Ok(Self {
            group,
            episode,
            map,
            slots,
        })
    }

    /// Create `count` agents positioned by `placement`.
    pub fn spawn(
        group: AgentGroup,
        episode: u32,
        map: Arc<ObstacleMap>,
        placement: &Placement,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Self, PlacementError> {
        let positions = placement.resolve(&map, count, rng)?;
        Self::new(group, episode, map, positions)
    }

    /// Group of every agent in this layer.
    pub fn group(&self) -> AgentGroup {
        self.group
    }

    /// Episode counter the handles were minted with.
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Extent of the underlying map.
    pub fn dims(&self) -> GridDims {
        self.map.dims()
    }

    /// Obstacle map the agents move on.
    pub fn map(&self) -> &ObstacleMap {
        &self.map
    }

    /// Number of slots, tombstoned ones included.
    pub fn n_agents(&self) -> usize {
        self.slots.len()
    }

    /// Number of agents not tombstoned.
    pub fn n_live(&self) -> usize {
        self.slots.iter().filter(|s| !s.removed).count()
    }

    /// Whether the layer has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Position of agent `i`, or `None` if `i` is out of range.
    pub fn position(&self, i: usize) -> Option<Position> {
        self.slots.get(i).map(|s| s.position)
    }

    /// Handle of agent `i`, or `None` if `i` is out of range.
    pub fn handle(&self, i: usize) -> Option<AgentHandle> {
        self.slots.get(i).map(|s| s.handle)
    }

    /// Whether agent `i` is tombstoned. Out-of-range indices read as removed.
    pub fn is_removed(&self, i: usize) -> bool {
        self.slots.get(i).map_or(true, |s| s.removed)
    }

    /// Current index of `handle`, if it is still in this layer.
    pub fn index_of(&self, handle: AgentHandle) -> Option<usize> {
        self.slots.iter().position(|s| s.handle == handle)
    }

    /// Current position of `handle`, if it is still in this layer.
    pub fn position_of(&self, handle: AgentHandle) -> Option<Position> {
        self.index_of(handle).map(|i| self.slots[i].position)
    }

    /// Live agents as `(index, handle, position)`.
    pub fn live(&self) -> impl Iterator<Item = (usize, AgentHandle, Position)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.removed)
            .map(|(i, s)| (i, s.handle, s.position))
    }

    /// Positions of the live agents, in index order.
    pub fn live_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.slots.iter().filter(|s| !s.removed).map(|s| s.position)
    }

    /// Apply one movement primitive to agent `i`.
    ///
    /// A move off the grid or onto an obstacle leaves the agent where it
    /// is; tombstoned agents never move. Returns the resulting position,
    /// or `None` if `i` is out of range.
    pub fn move_agent(&mut self, i: usize, direction: Direction) -> Option<Position> {
        let map = &self.map;
        let slot = self.slots.get_mut(i)?;
        if slot.removed {
            return Some(slot.position);
        }
        let (dx, dy) = direction.offset();
        let next = slot.position.offset(dx, dy);
        if map.is_free(next) {
            slot.position = next;
        }
        Some(slot.position)
    }

    /// Live agent count per cell, x-major, one entry per grid cell.
    pub fn state_matrix(&self) -> Vec<f32> {
        let dims = self.map.dims();
        let mut out = vec![0.0; dims.cell_count()];
        for slot in self.slots.iter().filter(|s| !s.removed) {
            if let Some(idx) = dims.index(slot.position) {
                out[idx] += 1.0;
            }
        }
        out
    }

    /// Tombstone the agent behind `handle`.
    ///
    /// Returns `true` if the agent was live and is now tombstoned, `false`
    /// if it was already tombstoned or is not in this layer.
    pub fn mark_removed(&mut self, handle: AgentHandle) -> bool {
        match self.slots.iter_mut().find(|s| s.handle == handle) {
            Some(slot) if !slot.removed => {
                slot.removed = true;
                true
            }
            _ => false,
        }
    }

    /// Drop every tombstoned slot, shifting later indices down.
    ///
    /// Returns the dropped handles in their former index order.
    pub fn compact(&mut self) -> Vec<AgentHandle> {
        let dropped = self
            .slots
            .iter()
            .filter(|s| s.removed)
            .map(|s| s.handle)
            .collect();
        self.slots.retain(|s| !s.removed);
        dropped
    }

    /// Remove agent `i` immediately; every higher index shifts down by one.
    pub fn remove_agent(&mut self, i: usize) -> Option<AgentHandle> {
        if i < self.slots.len() {
            Some(self.slots.remove(i).handle)
        } else {
            None
        }
    }
}
