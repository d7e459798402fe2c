//! Observation extraction for the Overwatch gridworld.
//!
//! Every surveillance agent sees an `obs_range × obs_range` window of
//! the Grid State centred on itself. [`WindowClip`] computes which part
//! of the grid overlaps the window, [`WindowExtractor`] fills reusable
//! per-agent [`LocalWindow`] buffers, and [`ObsLayout`] decides whether
//! callers receive the full five-channel window or a flat vector.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod geometry;
pub mod layout;
pub mod window;

pub use geometry::{is_interior, WindowClip};
pub use layout::{ObsLayout, ObsShape, ObsSpace};
pub use window::{LocalWindow, WindowExtractor, GRID_CHANNELS, ID_CHANNEL, WINDOW_CHANNELS};
