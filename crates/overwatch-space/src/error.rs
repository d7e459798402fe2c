//! Error types for grid construction and map parsing.

use overwatch_core::Position;
use std::fmt;

/// Errors arising from grid construction, map parsing or spatial queries.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// A dimension exceeds the representable coordinate range.
    DimensionTooLarge {
        /// Which dimension (`"xs"` or `"ys"`).
        name: &'static str,
        /// The requested value.
        value: u32,
        /// The maximum allowed value.
        max: u32,
    },
    /// A position is outside the bounds of the grid.
    PositionOutOfBounds {
        /// The offending position.
        position: Position,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// Map rows have inconsistent lengths.
    RaggedMap {
        /// Index of the first row whose length differs.
        row: usize,
        /// Length of row 0.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },
    /// A map cell could not be interpreted.
    InvalidCell {
        /// Flat index of the cell.
        index: usize,
        /// Description of the offending content.
        content: String,
    },
    /// The obstacle layer changes only with the map.
    ObstacleLayerReadOnly,
    /// A layer buffer does not match the grid's cell count.
    LayerSizeMismatch {
        /// Expected number of cells.
        expected: usize,
        /// Supplied number of cells.
        got: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} = {value} exceeds maximum {max}")
            }
            Self::PositionOutOfBounds { position, bounds } => {
                write!(f, "position {position} out of bounds: {bounds}")
            }
            Self::RaggedMap { row, expected, got } => {
                write!(f, "map row {row} has {got} cells, expected {expected}")
            }
            Self::InvalidCell { index, content } => {
                write!(f, "invalid map cell at index {index}: {content}")
            }
            Self::ObstacleLayerReadOnly => {
                write!(f, "obstacle layer is only written from a map")
            }
            Self::LayerSizeMismatch { expected, got } => {
                write!(f, "layer has {got} cells, grid has {expected}")
            }
        }
    }
}

impl std::error::Error for GridError {}
