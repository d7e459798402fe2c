//! Initial agent placement.

use overwatch_core::Position;
use overwatch_space::ObstacleMap;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rejection-sampling attempts before falling back to the free-cell list.
const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// How a group's agents are positioned at reset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Uniformly random free cells, drawn independently per agent.
    #[default]
    Random,
    /// Exactly these positions, one per agent, in index order.
    Fixed(Vec<Position>),
}

/// Errors from resolving a [`Placement`] against a map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementError {
    /// The map has no free cell to put an agent on.
    NoFreeCells,
    /// A fixed placement lists the wrong number of positions.
    WrongCount {
        /// Agents in the group.
        expected: usize,
        /// Positions supplied.
        got: usize,
    },
    /// A fixed position is off the grid or on an obstacle.
    Blocked {
        /// The offending position.
        position: Position,
    },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFreeCells => write!(f, "map has no free cell to place agents on"),
            Self::WrongCount { expected, got } => {
                write!(f, "fixed placement lists {got} positions for {expected} agents")
            }
            Self::Blocked { position } => {
                write!(f, "fixed position {position} is off the grid or blocked")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

impl Placement {
    /// Check that `count` agents can be placed on `map`. Fixed placements
    /// must list exactly `count` free positions.
    pub fn validate(&self, map: &ObstacleMap, count: usize) -> Result<(), PlacementError> {
        match self {
            Placement::Random => {
                if count > 0 && map.free_positions().is_empty() {
                    return Err(PlacementError::NoFreeCells);
                }
                Ok(())
            }
            Placement::Fixed(positions) => {
                if positions.len() != count {
                    return Err(PlacementError::WrongCount {
                        expected: count,
                        got: positions.len(),
                    });
                }
                match positions.iter().find(|p| !map.is_free(**p)) {
                    Some(&position) => Err(PlacementError::Blocked { position }),
                    None => Ok(()),
                }
            }
        }
    }

    /// Resolve `count` starting positions on `map`.
    ///
    /// A fixed placement may list more positions than `count`; the first
    /// `count` are used. This keeps a fixed layout usable after the
    /// curriculum shrinks a group.
    pub fn resolve(
        &self,
        map: &ObstacleMap,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Position>, PlacementError> {
        match self {
            Placement::Random => {
                self.validate(map, count)?;
                Ok((0..count).map(|_| sample_free(map, rng)).collect())
            }
            Placement::Fixed(positions) => {
                let used = positions.get(..count).ok_or(PlacementError::WrongCount {
                    expected: count,
                    got: positions.len(),
                })?;
                Placement::Fixed(used.to_vec()).validate(map, count)?;
                Ok(used.to_vec())
            }
        }
    }
}

/// Draw one free cell uniformly at random. Caller guarantees one exists.
fn sample_free(map: &ObstacleMap, rng: &mut dyn RngCore) -> Position {
    let dims = map.dims();
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let pos = Position::new(
            rng.gen_range(0..dims.xs() as i32),
            rng.gen_range(0..dims.ys() as i32),
        );
        if map.is_free(pos) {
            return pos;
        }
    }
    let free = map.free_positions();
    tracing::warn!(
        free_cells = free.len(),
        "placement rejection sampling exhausted, drawing from free-cell list"
    );
    free[rng.gen_range(0..free.len())]
}
