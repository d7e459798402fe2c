//! Environment configuration, validation, and error types.
//!
//! [`EnvConfig`] holds every serializable setting of a [`SniperEnv`](crate::SniperEnv).
//! [`validate()`](EnvConfig::validate) checks it against the map pool at
//! construction so that misconfiguration fails loudly instead of
//! producing silently wrong observations.

use std::error::Error;
use std::fmt;

use overwatch_agents::{Placement, PlacementError};
use overwatch_core::{AgentGroup, ObsError};
use overwatch_obs::ObsLayout;
use overwatch_rules::{CapturePolicy, RewardCount, RewardMech};
use overwatch_space::ObstacleMap;
use serde::{Deserialize, Serialize};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building or resetting an environment.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// No obstacle map was supplied.
    EmptyMapPool,
    /// A pooled map differs in size from the first map.
    MapDimsMismatch {
        /// Index of the offending map in the pool.
        index: usize,
        /// `(xs, ys)` of the first map.
        expected: (u32, u32),
        /// `(xs, ys)` of the offending map.
        got: (u32, u32),
    },
    /// `obs_range` is zero or even.
    InvalidObsRange {
        /// The rejected value.
        value: u32,
    },
    /// `obs_range` is wider than any window the maps can need.
    ObsRangeTooLarge {
        /// The rejected value.
        value: u32,
        /// `2 * max(xs, ys) + 1` of the pooled maps.
        max: u32,
    },
    /// There must be at least one surveillance agent.
    NoSurveillance,
    /// `layer_normalization` is NaN, infinite, zero, or negative.
    InvalidNormalization {
        /// The rejected value.
        value: f32,
    },
    /// A reward constant is NaN or infinite.
    NonFiniteReward {
        /// Name of the field.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Threshold capture with a zero threshold would capture every target.
    ZeroCatchThreshold,
    /// A curriculum parameter is out of range.
    InvalidCurriculum {
        /// Description of the violated constraint.
        reason: String,
    },
    /// A group cannot be placed on one of the pooled maps.
    Placement {
        /// Group being placed.
        group: AgentGroup,
        /// Index of the map in the pool.
        map: usize,
        /// Underlying placement failure.
        source: PlacementError,
    },
    /// The initial observations could not be extracted.
    Observation(ObsError),
    /// A JSON configuration could not be parsed.
    Json {
        /// Parser message.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMapPool => write!(f, "map pool is empty"),
            Self::MapDimsMismatch {
                index,
                expected,
                got,
            } => write!(
                f,
                "map {index} is {}x{}, expected {}x{} like map 0",
                got.0, got.1, expected.0, expected.1
            ),
            Self::InvalidObsRange { value } => {
                write!(f, "obs_range must be odd and positive, got {value}")
            }
            Self::ObsRangeTooLarge { value, max } => {
                write!(f, "obs_range {value} exceeds {max}, twice the widest map plus one")
            }
            Self::NoSurveillance => write!(f, "n_surveillance must be at least 1"),
            Self::InvalidNormalization { value } => {
                write!(f, "layer_normalization must be finite and positive, got {value}")
            }
            Self::NonFiniteReward { name, value } => {
                write!(f, "{name} must be finite, got {value}")
            }
            Self::ZeroCatchThreshold => write!(f, "catch_threshold must be at least 1"),
            Self::InvalidCurriculum { reason } => write!(f, "invalid curriculum: {reason}"),
            Self::Placement { group, map, source } => {
                write!(f, "cannot place {group} agents on map {map}: {source}")
            }
            Self::Observation(e) => write!(f, "observation: {e}"),
            Self::Json { reason } => write!(f, "invalid JSON config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Placement { source, .. } => Some(source),
            Self::Observation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ObsError> for ConfigError {
    fn from(e: ObsError) -> Self {
        Self::Observation(e)
    }
}

// ── EnvConfig ──────────────────────────────────────────────────────

/// Serializable settings of a [`SniperEnv`](crate::SniperEnv).
///
/// Every field has a default, so a partial JSON document deserializes
/// into a complete config. Policies, the termination predicate and the
/// map pool are not serialized; they go through
/// [`SniperEnvBuilder`](crate::SniperEnvBuilder).
///
/// # Examples
///
/// ```
/// use overwatch_engine::EnvConfig;
///
/// let config = EnvConfig::from_json(r#"{ "n_snipers": 3, "reward_mech": "local" }"#).unwrap();
/// assert_eq!(config.n_snipers, 3);
/// assert_eq!(config.obs_range, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Draw a map from the pool at every reset instead of always using map 0.
    pub sample_maps: bool,
    /// Shared mean reward or one reward per agent.
    pub reward_mech: RewardMech,
    /// Side length of each observation window. Must be odd.
    pub obs_range: u32,
    /// Return flat observation vectors instead of five-channel windows.
    pub flatten: bool,
    /// Learning agents.
    pub n_surveillance: usize,
    /// Threat agents.
    pub n_snipers: usize,
    /// Observed agents.
    pub n_targets: usize,
    /// Whether visible agents count per occupied cell or per agent.
    pub reward_count: RewardCount,
    /// Reward per visible sniper-occupied cell.
    pub sniper_penalty: f32,
    /// Reward per visible target-occupied cell.
    pub target_bonus: f32,
    /// Flat reward added to every agent after each step.
    pub urgency_reward: f32,
    /// Append the identity scalar to flat observations.
    pub include_id: bool,
    /// Surround capture when `true`, co-location threshold otherwise.
    pub surround: bool,
    /// Divisor applied to every observed grid value.
    pub layer_normalization: f32,
    /// Snipers needed on a target's cell under threshold capture.
    pub catch_threshold: u32,
    /// Seed of the environment RNG.
    pub seed: u64,
    /// Resolve and remove captured targets during `step`.
    pub remove_captured: bool,
    /// Starting positions of the surveillance agents.
    pub surveillance_placement: Placement,
    /// Starting positions of the snipers.
    pub sniper_placement: Placement,
    /// Starting positions of the targets.
    pub target_placement: Placement,
    /// Curriculum constraint window, kept in `[0, 1]`.
    pub constraint_window: f32,
    /// Shrink the sniper and target groups every this many iterations.
    pub curriculum_remove_every: u64,
    /// Added to `constraint_window` at every curriculum update.
    pub curriculum_constrain_rate: f32,
    /// Zero the target bonus after this iteration; `None` keeps it.
    pub curriculum_turn_off_shaping: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            sample_maps: false,
            reward_mech: RewardMech::Global,
            obs_range: 3,
            flatten: true,
            n_surveillance: 1,
            n_snipers: 1,
            n_targets: 1,
            reward_count: RewardCount::Cells,
            sniper_penalty: -1.0,
            target_bonus: 0.1,
            urgency_reward: 0.0,
            include_id: true,
            surround: true,
            layer_normalization: 10.0,
            catch_threshold: 2,
            seed: 0,
            remove_captured: true,
            surveillance_placement: Placement::Random,
            sniper_placement: Placement::Random,
            target_placement: Placement::Random,
            constraint_window: 1.0,
            curriculum_remove_every: 500,
            curriculum_constrain_rate: 0.0,
            curriculum_turn_off_shaping: None,
        }
    }
}

impl EnvConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json {
            reason: e.to_string(),
        })
    }

    /// Serialize the config to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json {
            reason: e.to_string(),
        })
    }

    /// Capture rule selected by `surround` and `catch_threshold`.
    pub fn capture_policy(&self) -> CapturePolicy {
        if self.surround {
            CapturePolicy::Surround
        } else {
            CapturePolicy::Threshold {
                catch_threshold: self.catch_threshold,
            }
        }
    }

    /// Observation layout selected by `flatten` and `include_id`.
    pub fn obs_layout(&self) -> ObsLayout {
        ObsLayout {
            flatten: self.flatten,
            include_id: self.include_id,
        }
    }

    /// Placement and size of `group`.
    pub fn group(&self, group: AgentGroup) -> (&Placement, usize) {
        match group {
            AgentGroup::Surveillance => (&self.surveillance_placement, self.n_surveillance),
            AgentGroup::Sniper => (&self.sniper_placement, self.n_snipers),
            AgentGroup::Target => (&self.target_placement, self.n_targets),
        }
    }

    /// Validate every setting against the map pool.
    pub fn validate(&self, maps: &[ObstacleMap]) -> Result<(), ConfigError> {
        // 1. Map pool: nonempty, one size.
        let first = maps.first().ok_or(ConfigError::EmptyMapPool)?.dims();
        for (index, map) in maps.iter().enumerate().skip(1) {
            let dims = map.dims();
            if dims != first {
                return Err(ConfigError::MapDimsMismatch {
                    index,
                    expected: (first.xs(), first.ys()),
                    got: (dims.xs(), dims.ys()),
                });
            }
        }

        // 2. Observation window.
        if self.obs_range == 0 || self.obs_range % 2 == 0 {
            return Err(ConfigError::InvalidObsRange {
                value: self.obs_range,
            });
        }
        let max = 2 * u64::from(first.xs().max(first.ys())) + 1;
        if u64::from(self.obs_range) > max {
            return Err(ConfigError::ObsRangeTooLarge {
                value: self.obs_range,
                max: u32::try_from(max).unwrap_or(u32::MAX),
            });
        }
        if !self.layer_normalization.is_finite() || self.layer_normalization <= 0.0 {
            return Err(ConfigError::InvalidNormalization {
                value: self.layer_normalization,
            });
        }

        // 3. Agents and rewards.
        if self.n_surveillance == 0 {
            return Err(ConfigError::NoSurveillance);
        }
        for (name, value) in [
            ("sniper_penalty", self.sniper_penalty),
            ("target_bonus", self.target_bonus),
            ("urgency_reward", self.urgency_reward),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteReward { name, value });
            }
        }
        if !self.surround && self.catch_threshold == 0 {
            return Err(ConfigError::ZeroCatchThreshold);
        }

        // 4. Curriculum.
        if self.curriculum_remove_every == 0 {
            return Err(ConfigError::InvalidCurriculum {
                reason: "curriculum_remove_every must be at least 1".into(),
            });
        }
        if !self.constraint_window.is_finite() || !self.curriculum_constrain_rate.is_finite() {
            return Err(ConfigError::InvalidCurriculum {
                reason: "constraint window and rate must be finite".into(),
            });
        }

        // 5. Every group fits on every map it may be reset onto.
        for (index, map) in maps.iter().enumerate() {
            for group in [AgentGroup::Surveillance, AgentGroup::Sniper, AgentGroup::Target] {
                let (placement, count) = self.group(group);
                placement
                    .validate(map, count)
                    .map_err(|source| ConfigError::Placement {
                        group,
                        map: index,
                        source,
                    })?;
            }
        }
        Ok(())
    }
}
