//! Overwatch: a multi-agent surveillance gridworld for reinforcement
//! learning.
//!
//! Surveillance agents learn to keep watch over a 2D obstacle map while
//! snipers (penalized when seen) and targets (rewarded when seen) move
//! under scripted policies. Snipers capture targets by surrounding them.
//!
//! This is the facade crate re-exporting every Overwatch sub-crate.
//!
//! # Quick start
//!
//! ```rust
//! use overwatch::prelude::*;
//!
//! let config = EnvConfig {
//!     n_surveillance: 2,
//!     n_snipers: 3,
//!     n_targets: 2,
//!     ..EnvConfig::default()
//! };
//! let mut env = SniperEnvBuilder::new(config)
//!     .map(ObstacleMap::open(12, 12).unwrap())
//!     .termination(StepLimit(10))
//!     .build()
//!     .unwrap();
//!
//! let obs = env.reset().unwrap();
//! assert_eq!(obs.len(), 2);
//! loop {
//!     let out = env.step(vec![Direction::Stay.index(); 2]).unwrap();
//!     assert_eq!(out.rewards.len(), 1);
//!     if out.done {
//!         break;
//!     }
//! }
//! assert_eq!(env.current_tick(), TickId(10));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `overwatch-core` | Positions, agent groups and handles, error enums |
//! | [`space`] | `overwatch-space` | Obstacle maps and the layered grid state |
//! | [`agents`] | `overwatch-agents` | Agent layers, movement, placement, policies |
//! | [`obs`] | `overwatch-obs` | Local observation windows |
//! | [`rules`] | `overwatch-rules` | Rewards and captures |
//! | [`engine`] | `overwatch-engine` | The `SniperEnv` simulation controller |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core identifiers and error types (`overwatch-core`).
pub use overwatch_core as types;

/// Obstacle maps and grid state (`overwatch-space`).
///
/// [`space::GridState`] holds the five layers every observation is cut
/// from.
pub use overwatch_space as space;

/// Agent position layers, movement primitives and controller policies
/// (`overwatch-agents`).
pub use overwatch_agents as agents;

/// Observation window extraction (`overwatch-obs`).
pub use overwatch_obs as obs;

/// Reward evaluation and capture resolution (`overwatch-rules`).
pub use overwatch_rules as rules;

/// The simulation controller (`overwatch-engine`).
///
/// [`engine::SniperEnv`] is built through [`engine::SniperEnvBuilder`].
pub use overwatch_engine as engine;

/// Common imports for typical Overwatch usage.
///
/// ```rust
/// use overwatch::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use overwatch_core::{AgentGroup, AgentHandle, Position, TickId};

    // Errors
    pub use overwatch_core::{ActionError, ObsError, StepError};
    pub use overwatch_engine::ConfigError;

    // Space
    pub use overwatch_space::{GridState, Layer, ObstacleMap};

    // Agents
    pub use overwatch_agents::{
        AgentLayer, Direction, Placement, Policy, RandomPolicy, StationaryPolicy, N_ACTIONS,
    };

    // Observation and rules
    pub use overwatch_obs::{ObsLayout, ObsSpace};
    pub use overwatch_rules::{CapturePolicy, RewardCount, RewardMech};

    // Engine
    pub use overwatch_engine::{
        Actions, AllTargetsCaptured, EnvConfig, EnvState, Never, SniperEnv, SniperEnvBuilder,
        StepInfo, StepLimit, StepMetrics, StepOutcome, Termination,
    };
}
