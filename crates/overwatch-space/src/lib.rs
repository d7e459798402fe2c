//! Spatial data structures for Overwatch.
//!
//! Everything the per-step computation reads flows through three types:
//!
//! - [`GridDims`]: the `xs × ys` extent of the map, bounds checks,
//!   flat indexing and the 4-connected cardinal neighbourhood.
//! - [`ObstacleMap`]: the static obstacle layout chosen at reset.
//! - [`GridState`]: the five stacked layers (obstacles, snipers,
//!   targets, surveillance, scratch) that observations and captures
//!   are computed from.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod layers;
pub mod map;

pub use error::GridError;
pub use grid::{GridDims, CARDINAL_OFFSETS};
pub use layers::{GridState, Layer, LAYER_COUNT};
pub use map::{Cell, ObstacleMap, OBSTACLE_VALUE};
