//! Error types for the Overwatch environment.
//!
//! Organized by subsystem: observation extraction, action decoding and
//! environment stepping. Construction-time failures live with the
//! configuration in `overwatch-engine`.

use crate::id::Position;
use std::error::Error;
use std::fmt;

/// Errors from observation window extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObsError {
    /// The requested agent index does not exist in its layer.
    AgentIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of agents in the layer.
        len: usize,
    },
    /// The agent's position lies outside the grid.
    PositionOutOfBounds {
        /// The offending position.
        position: Position,
    },
    /// The grid state and the extractor were built for different maps.
    DimensionMismatch {
        /// Description of the mismatch.
        reason: String,
    },
    /// The window size or normalization constant cannot produce a
    /// centred, finite observation.
    InvalidWindow {
        /// Why the window was rejected.
        reason: String,
    },
}

impl fmt::Display for ObsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgentIndexOutOfRange { index, len } => {
                write!(f, "agent index {index} out of range for layer of {len}")
            }
            Self::PositionOutOfBounds { position } => {
                write!(f, "agent position {position} is outside the grid")
            }
            Self::DimensionMismatch { reason } => write!(f, "dimension mismatch: {reason}"),
            Self::InvalidWindow { reason } => write!(f, "invalid observation window: {reason}"),
        }
    }
}

impl Error for ObsError {}

/// Errors from decoding surveillance actions at step time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// A per-agent action index is outside the agent's action space.
    InvalidAction {
        /// Surveillance agent index.
        agent: usize,
        /// The rejected action index.
        action: usize,
        /// Size of the agent's discrete action space.
        n_actions: usize,
    },
    /// The number of per-agent actions differs from the agent count.
    WrongActionCount {
        /// Number of surveillance agents.
        expected: usize,
        /// Number of actions supplied.
        got: usize,
    },
    /// A flattened joint action is outside the joint action space.
    JointActionOutOfRange {
        /// The rejected joint index.
        action: u64,
        /// Size of the joint action space.
        size: u64,
    },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAction {
                agent,
                action,
                n_actions,
            } => write!(
                f,
                "action {action} for agent {agent} outside action space of size {n_actions}"
            ),
            Self::WrongActionCount { expected, got } => {
                write!(f, "expected {expected} actions, got {got}")
            }
            Self::JointActionOutOfRange { action, size } => {
                write!(f, "joint action {action} outside joint space of size {size}")
            }
        }
    }
}

impl Error for ActionError {}

/// Errors from `step()` on the simulation controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// `step()` was called before the first `reset()`.
    NotReady,
    /// The episode already reported terminal; `reset()` is required.
    Terminal,
    /// The supplied actions were rejected.
    InvalidAction(ActionError),
    /// Observation extraction failed.
    Observation(ObsError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "environment must be reset before stepping"),
            Self::Terminal => write!(f, "episode is terminal; reset before stepping"),
            Self::InvalidAction(e) => write!(f, "invalid action: {e}"),
            Self::Observation(e) => write!(f, "observation failed: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAction(e) => Some(e),
            Self::Observation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ActionError> for StepError {
    fn from(e: ActionError) -> Self {
        Self::InvalidAction(e)
    }
}

impl From<ObsError> for StepError {
    fn from(e: ObsError) -> Self {
        Self::Observation(e)
    }
}
