//! Episode termination predicates.

use overwatch_agents::AgentLayer;
use overwatch_core::TickId;
use overwatch_space::GridState;

/// Read-only view of the environment after a step, handed to a
/// [`Termination`] predicate.
#[derive(Clone, Copy, Debug)]
pub struct TerminalView<'a> {
    /// Steps taken this episode, including the one just finished.
    pub tick: TickId,
    /// Grid state after the step.
    pub grid: &'a GridState,
    /// Surveillance agents.
    pub surveillance: &'a AgentLayer,
    /// Sniper agents.
    pub snipers: &'a AgentLayer,
    /// Target agents, captured ones already compacted away.
    pub targets: &'a AgentLayer,
    /// Targets captured since the last reset.
    pub captured_total: usize,
}

/// Decides whether an episode has ended.
pub trait Termination: Send {
    /// Whether the episode is over after the step described by `view`.
    fn is_terminal(&self, view: &TerminalView<'_>) -> bool;

    /// Short name for logging.
    fn name(&self) -> &str {
        "termination"
    }
}

/// Episodes never end on their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Never;

impl Termination for Never {
    fn is_terminal(&self, _view: &TerminalView<'_>) -> bool {
        false
    }

    fn name(&self) -> &str {
        "never"
    }
}

/// Ends the episode once every target has been captured.
///
/// An episode that starts without targets never ends through this
/// predicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllTargetsCaptured;

impl Termination for AllTargetsCaptured {
    fn is_terminal(&self, view: &TerminalView<'_>) -> bool {
        view.captured_total > 0 && view.targets.n_live() == 0
    }

    fn name(&self) -> &str {
        "all_targets_captured"
    }
}

/// Ends the episode after a fixed number of steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepLimit(pub u64);

impl Termination for StepLimit {
    fn is_terminal(&self, view: &TerminalView<'_>) -> bool {
        view.tick.0 >= self.0
    }

    fn name(&self) -> &str {
        "step_limit"
    }
}
