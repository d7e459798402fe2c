//! Strongly-typed identifiers and the [`Position`] grid coordinate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate on the occupancy grid.
///
/// `x` indexes the first map axis (`0..xs`) and `y` the second
/// (`0..ys`). Signed so that window arithmetic may step off the grid
/// before clipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// First-axis coordinate.
    pub x: i32,
    /// Second-axis coordinate.
    pub y: i32,
}

impl Position {
    /// Construct a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position shifted by `(dx, dy)`. No bounds checking.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The three agent populations sharing the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentGroup {
    /// Learning agents that observe the grid and receive rewards.
    Surveillance,
    /// Threat agents, driven by an external controller policy.
    Sniper,
    /// Agents the surveillance group tries to keep in view.
    Target,
}

impl fmt::Display for AgentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentGroup::Surveillance => "surveillance",
            AgentGroup::Sniper => "sniper",
            AgentGroup::Target => "target",
        };
        f.write_str(name)
    }
}

/// Stable identity of one agent for the lifetime of an episode.
///
/// Raw indices into an agent layer shift when an agent is compacted
/// away; handles never do. `episode` distinguishes agents spawned by
/// different resets so a handle held across a reset never aliases a
/// fresh agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct AgentHandle {
    group: AgentGroup,
    episode: u32,
    serial: u32,
}

impl AgentHandle {
    /// Create a handle. Only agent layers mint handles.
    pub fn new(group: AgentGroup, episode: u32, serial: u32) -> Self {
        Self {
            group,
            episode,
            serial,
        }
    }

    /// Group this agent belongs to.
    pub fn group(&self) -> AgentGroup {
        self.group
    }

    /// Episode counter at spawn time.
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Spawn-order serial within the episode.
    pub fn serial(&self) -> u32 {
        self.serial
    }
}

impl fmt::Display for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.group, self.serial, self.episode)
    }
}

/// Monotonically increasing step counter.
///
/// Reset to 0 by every environment reset, incremented by each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
