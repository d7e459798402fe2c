//! Agent populations for Overwatch.
//!
//! Each agent group (surveillance, snipers, targets) lives in its own
//! [`AgentLayer`]: a slot arena of positions addressed by index for the
//! hot path and by [`AgentHandle`](overwatch_core::AgentHandle) for
//! identity that must survive removals. Movement uses the five discrete
//! [`Direction`] primitives; non-learning groups are driven by a
//! pluggable [`Policy`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod layer;
pub mod placement;
pub mod policy;

pub use action::{Direction, N_ACTIONS};
pub use layer::AgentLayer;
pub use placement::{Placement, PlacementError};
pub use policy::{Policy, RandomPolicy, StationaryPolicy};
