//! Core types for the Overwatch surveillance gridworld.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers shared by every other crate (positions, agent groups,
//! agent handles, tick counters) and the error enums that surface from
//! observation extraction and environment stepping.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;

pub use error::{ActionError, ObsError, StepError};
pub use id::{AgentGroup, AgentHandle, Position, TickId};
