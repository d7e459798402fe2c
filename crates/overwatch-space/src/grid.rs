//! Grid extent, flat indexing and the cardinal neighbourhood.

use crate::error::GridError;
use overwatch_core::Position;
use smallvec::SmallVec;

/// Offsets of the four cardinal neighbours, in the order the capture
/// engine scans them: `x-1`, `x+1`, `y+1`, `y-1`.
pub const CARDINAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

/// Extent of an `xs × ys` occupancy grid.
///
/// Cells are addressed by [`Position`] with `0 <= x < xs` and
/// `0 <= y < ys`. Layers store cells x-major: the flat index of
/// `(x, y)` is `x * ys + y`. Edges absorb: a cell on the boundary has
/// fewer in-bounds neighbours (corners have 2, edges have 3).
///
/// # Examples
///
/// ```
/// use overwatch_space::GridDims;
/// use overwatch_core::Position;
///
/// let dims = GridDims::new(5, 5).unwrap();
/// assert_eq!(dims.cell_count(), 25);
/// assert_eq!(dims.neighbours(Position::new(0, 0)).len(), 2);
/// assert_eq!(dims.neighbours(Position::new(2, 2)).len(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    xs: u32,
    ys: u32,
}

impl GridDims {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a grid extent.
    ///
    /// Returns `Err(GridError::EmptyGrid)` if either dimension is 0, or
    /// `Err(GridError::DimensionTooLarge)` if either exceeds `i32::MAX`.
    pub fn new(xs: u32, ys: u32) -> Result<Self, GridError> {
        if xs == 0 || ys == 0 {
            return Err(GridError::EmptyGrid);
        }
        if xs > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "xs",
                value: xs,
                max: Self::MAX_DIM,
            });
        }
        if ys > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "ys",
                value: ys,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self { xs, ys })
    }

    /// Extent along the first axis.
    pub fn xs(&self) -> u32 {
        self.xs
    }

    /// Extent along the second axis.
    pub fn ys(&self) -> u32 {
        self.ys
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.xs as usize) * (self.ys as usize)
    }

    /// Whether `pos` lies on the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.xs as i32 && pos.y >= 0 && pos.y < self.ys as i32
    }

    /// Flat index of `pos`, or `None` if it is off the grid.
    pub fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.x as usize) * (self.ys as usize) + pos.y as usize)
        } else {
            None
        }
    }

    /// Position of a flat index. Inverse of [`index`](Self::index).
    pub fn position(&self, index: usize) -> Position {
        let ys = self.ys as usize;
        Position::new((index / ys) as i32, (index % ys) as i32)
    }

    /// Flat index of `pos`, or a descriptive error if it is off the grid.
    pub fn checked_index(&self, pos: Position) -> Result<usize, GridError> {
        self.index(pos).ok_or_else(|| GridError::PositionOutOfBounds {
            position: pos,
            bounds: format!("[0, {}) x [0, {})", self.xs, self.ys),
        })
    }

    /// Whether `x` sits on the first or last column of the first axis.
    pub fn on_x_boundary(&self, pos: Position) -> bool {
        pos.x == 0 || pos.x == self.xs as i32 - 1
    }

    /// Whether `y` sits on the first or last column of the second axis.
    pub fn on_y_boundary(&self, pos: Position) -> bool {
        pos.y == 0 || pos.y == self.ys as i32 - 1
    }

    /// In-bounds cardinal neighbours of `pos`, in [`CARDINAL_OFFSETS`] order.
    pub fn neighbours(&self, pos: Position) -> SmallVec<[Position; 4]> {
        CARDINAL_OFFSETS
            .iter()
            .map(|&(dx, dy)| pos.offset(dx, dy))
            .filter(|n| self.contains(*n))
            .collect()
    }

    /// Iterate every position in flat-index order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count()).map(move |i| self.position(i))
    }
}
