//! Discrete movement primitives.

/// Size of every agent's discrete action space.
pub const N_ACTIONS: usize = 5;

/// Movement primitive, indexed `0..N_ACTIONS`.
///
/// The index order is part of the action-space contract: policies and
/// training code address actions by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Move to `x - 1`.
    West = 0,
    /// Move to `x + 1`.
    East = 1,
    /// Move to `y + 1`.
    North = 2,
    /// Move to `y - 1`.
    South = 3,
    /// Agent does not move.
    Stay = 4,
}

impl Direction {
    /// All directions in action-index order.
    pub const ALL: [Direction; N_ACTIONS] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
        Direction::Stay,
    ];

    /// Decode an action index, or `None` if it is outside the action space.
    pub fn from_index(action: usize) -> Option<Direction> {
        Self::ALL.get(action).copied()
    }

    /// Action index of this direction.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the `(dx, dy)` offset for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::Stay => (0, 0),
        }
    }
}
