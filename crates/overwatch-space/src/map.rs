//! Static obstacle maps.

use crate::error::GridError;
use crate::grid::GridDims;
use overwatch_core::Position;

/// Value an obstacle cell takes in Grid State layer 0.
///
/// Free cells are `0.0`. Observation windows take the absolute value,
/// so an obstacle reads the same as the out-of-bounds fill.
pub const OBSTACLE_VALUE: f32 = -1.0;

/// Content of one map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Traversable.
    Free,
    /// Blocked: agents cannot enter it and it cannot hold a sniper.
    Obstacle,
}

/// An immutable obstacle layout over an `xs × ys` grid.
///
/// # Examples
///
/// ```
/// use overwatch_space::ObstacleMap;
/// use overwatch_core::Position;
///
/// // One string per x, one character per y.
/// let map = ObstacleMap::from_ascii(&[
///     "...",
///     ".#.",
///     "...",
/// ]).unwrap();
/// assert!(map.is_obstacle(Position::new(1, 1)));
/// assert_eq!(map.free_positions().len(), 8);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleMap {
    dims: GridDims,
    cells: Vec<Cell>,
}

impl ObstacleMap {
    /// A map with no obstacles.
    pub fn open(xs: u32, ys: u32) -> Result<Self, GridError> {
        let dims = GridDims::new(xs, ys)?;
        Ok(Self {
            dims,
            cells: vec![Cell::Free; dims.cell_count()],
        })
    }

    /// Parse a map from text: `rows[x]` is the strip at that `x`, and
    /// its `y`-th character is `'#'` for an obstacle or `'.'` for free.
    pub fn from_ascii(rows: &[&str]) -> Result<Self, GridError> {
        let expected = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        for (row, text) in rows.iter().enumerate() {
            let got = text.chars().count();
            if got != expected {
                return Err(GridError::RaggedMap { row, expected, got });
            }
        }
        let dims = GridDims::new(rows.len() as u32, expected as u32)?;
        let mut cells = Vec::with_capacity(dims.cell_count());
        for text in rows {
            for ch in text.chars() {
                let cell = match ch {
                    '.' => Cell::Free,
                    '#' => Cell::Obstacle,
                    other => {
                        return Err(GridError::InvalidCell {
                            index: cells.len(),
                            content: format!("unexpected character {other:?}"),
                        })
                    }
                };
                cells.push(cell);
            }
        }
        Ok(Self { dims, cells })
    }

    /// Build a map from a layer-0 style matrix: `0.0` is free and
    /// [`OBSTACLE_VALUE`] is an obstacle, stored x-major.
    pub fn from_values(xs: u32, ys: u32, values: &[f32]) -> Result<Self, GridError> {
        let dims = GridDims::new(xs, ys)?;
        if values.len() != dims.cell_count() {
            return Err(GridError::LayerSizeMismatch {
                expected: dims.cell_count(),
                got: values.len(),
            });
        }
        let cells = values
            .iter()
            .enumerate()
            .map(|(index, &v)| {
                if v == 0.0 {
                    Ok(Cell::Free)
                } else if v == OBSTACLE_VALUE {
                    Ok(Cell::Obstacle)
                } else {
                    Err(GridError::InvalidCell {
                        index,
                        content: format!("value {v}"),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { dims, cells })
    }

    /// Return a copy with an obstacle placed at `pos`.
    pub fn with_obstacle(mut self, pos: Position) -> Result<Self, GridError> {
        let idx = self.dims.checked_index(pos)?;
        self.cells[idx] = Cell::Obstacle;
        Ok(self)
    }

    /// Grid extent.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Cell content at `pos`, or `None` off the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.dims.index(pos).map(|i| self.cells[i])
    }

    /// Whether `pos` is an in-bounds obstacle.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Obstacle)
    }

    /// Whether an agent may stand on `pos`.
    pub fn is_free(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Free)
    }

    /// All free positions in flat-index order.
    pub fn free_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Free)
            .map(|(i, _)| self.dims.position(i))
            .collect()
    }

    /// Number of obstacle cells.
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Obstacle).count()
    }

    /// The map as a layer-0 buffer (`0.0` free, [`OBSTACLE_VALUE`] blocked).
    pub fn layer_values(&self) -> Vec<f32> {
        self.cells
            .iter()
            .map(|c| match c {
                Cell::Free => 0.0,
                Cell::Obstacle => OBSTACLE_VALUE,
            })
            .collect()
    }
}
