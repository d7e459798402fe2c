//! Per-step timing and bookkeeping for the simulation controller.
//!
//! [`StepMetrics`] captures where time went in one `step()` call plus
//! cumulative capture counts, for telemetry and profiling.

/// Timing and capture counters collected during a single step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Time spent computing the pre-move rewards.
    pub reward_us: u64,
    /// Time spent moving all three groups, policies included.
    pub movement_us: u64,
    /// Time spent resolving captures and compacting targets.
    pub capture_us: u64,
    /// Time spent extracting the returned observations.
    pub observation_us: u64,
    /// Live targets after the step.
    pub targets_live: usize,
    /// Targets captured since the last reset.
    pub captures_total: usize,
}
