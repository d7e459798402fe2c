//! Surveillance reward.

use overwatch_agents::AgentLayer;
use overwatch_core::ObsError;
use overwatch_obs::{LocalWindow, WindowExtractor};
use overwatch_space::{GridState, Layer};
use serde::{Deserialize, Serialize};

/// How per-agent rewards are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMech {
    /// One shared scalar: the mean of the per-agent rewards.
    #[default]
    Global,
    /// One reward per surveillance agent.
    Local,
}

/// What a visible sniper or target contributes to the reward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCount {
    /// Each occupied cell counts once, however many agents share it.
    #[default]
    Cells,
    /// The normalized occupancy values are summed, so stacked agents add
    /// up and every agent is worth `1 / layer_normalization`.
    Occupancy,
}

/// Scores what each surveillance agent can see.
///
/// An agent's reward is `sniper_penalty` times the visible sniper count
/// plus `target_bonus` times the visible target count. With
/// [`RewardCount::Cells`] the count is the number of occupied cells; with
/// [`RewardCount::Occupancy`] it is the sum of the window's normalized
/// values for that layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RewardEvaluator {
    sniper_penalty: f32,
    target_bonus: f32,
    mech: RewardMech,
    count: RewardCount,
}

impl RewardEvaluator {
    /// Create an evaluator.
    pub fn new(sniper_penalty: f32, target_bonus: f32, mech: RewardMech) -> Self {
        Self {
            sniper_penalty,
            target_bonus,
            mech,
            count: RewardCount::Cells,
        }
    }

    /// Use `count` to turn a window layer into a count.
    pub fn with_count(mut self, count: RewardCount) -> Self {
        self.count = count;
        self
    }

    /// Reward per visible sniper-occupied cell (normally negative).
    pub fn sniper_penalty(&self) -> f32 {
        self.sniper_penalty
    }

    /// Reward per visible target-occupied cell.
    pub fn target_bonus(&self) -> f32 {
        self.target_bonus
    }

    /// Replace the target bonus (curriculum shaping).
    pub fn set_target_bonus(&mut self, target_bonus: f32) {
        self.target_bonus = target_bonus;
    }

    /// Aggregation mode.
    pub fn mech(&self) -> RewardMech {
        self.mech
    }

    /// Counting mode.
    pub fn count(&self) -> RewardCount {
        self.count
    }

    /// Reward for a single window.
    pub fn window_reward(&self, window: &LocalWindow) -> f32 {
        let snipers = self.layer_count(window, Layer::Snipers);
        let targets = self.layer_count(window, Layer::Targets);
        self.sniper_penalty * snipers + self.target_bonus * targets
    }

    fn layer_count(&self, window: &LocalWindow, layer: Layer) -> f32 {
        match self.count {
            RewardCount::Cells => window.count_nonzero(layer as usize) as f32,
            RewardCount::Occupancy => window.channel(layer as usize).iter().sum(),
        }
    }

    /// Per-agent rewards for every agent of `surveillance` against the
    /// current `grid`.
    pub fn evaluate(
        &self,
        extractor: &mut WindowExtractor,
        grid: &GridState,
        surveillance: &AgentLayer,
    ) -> Result<Vec<f32>, ObsError> {
        (0..surveillance.n_agents())
            .map(|i| {
                extractor
                    .extract_agent(grid, surveillance, i)
                    .map(|w| self.window_reward(w))
            })
            .collect()
    }

    /// Apply the aggregation mode: `Global` collapses to a one-element
    /// vector holding the mean (zero when there are no agents), `Local`
    /// returns `rewards` unchanged.
    pub fn aggregate(&self, rewards: Vec<f32>) -> Vec<f32> {
        match self.mech {
            RewardMech::Local => rewards,
            RewardMech::Global => {
                let mean = if rewards.is_empty() {
                    0.0
                } else {
                    rewards.iter().sum::<f32>() / rewards.len() as f32
                };
                vec![mean]
            }
        }
    }
}

impl Default for RewardEvaluator {
    fn default() -> Self {
        Self::new(-1.0, 0.1, RewardMech::Global)
    }
}
