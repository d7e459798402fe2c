//! Simulation controller for the Overwatch surveillance gridworld.
//!
//! [`SniperEnv`] runs the multi-agent episode loop: surveillance agents
//! act on the caller's actions, snipers and targets follow pluggable
//! [`Policy`](overwatch_agents::Policy) controllers, captures are
//! resolved every step, and each surveillance agent receives a local
//! observation window and a reward.
//!
//! Build one with [`SniperEnvBuilder`] from an [`EnvConfig`] and a pool
//! of obstacle maps.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod actions;
pub mod config;
pub mod curriculum;
pub mod env;
pub mod metrics;
pub mod termination;

pub use actions::Actions;
pub use config::{ConfigError, EnvConfig};
pub use curriculum::{Curriculum, CurriculumUpdate};
pub use env::{EnvState, SniperEnv, SniperEnvBuilder, StepInfo, StepOutcome};
pub use metrics::StepMetrics;
pub use termination::{AllTargetsCaptured, Never, StepLimit, TerminalView, Termination};
