//! The simulation controller.
//!
//! [`SniperEnv`] owns one episode's grid state, the three agent layers,
//! the reusable observation buffers and the RNG. It is a small state
//! machine: `reset()` moves it to [`EnvState::Ready`], each successful
//! `step()` to [`EnvState::Stepped`] or, when the termination predicate
//! fires, to [`EnvState::Terminal`].
//!
//! # Step order
//!
//! 1. Rewards are scored from what each surveillance agent saw *before*
//!    this step's movement.
//! 2. Surveillance actions are decoded. Sniper and target policies choose
//!    their actions from the same pre-move grid.
//! 3. Every agent moves, then grid layers 1–3 are refreshed.
//! 4. Captures are resolved and captured targets compacted away.
//! 5. Observations are extracted and copied out, the urgency reward is
//!    added, and the termination predicate is evaluated.
//!
//! Actions are validated before anything moves, so a rejected step
//! leaves the agents, the tick and the RNG untouched.

use std::sync::Arc;
use std::time::Instant;

use overwatch_agents::{AgentLayer, Direction, Policy, RandomPolicy, N_ACTIONS};
use overwatch_core::{ActionError, AgentGroup, AgentHandle, StepError, TickId};
use overwatch_obs::{ObsLayout, ObsSpace, WindowExtractor};
use overwatch_rules::{CaptureEngine, CaptureReport, RewardEvaluator};
use overwatch_space::{GridState, Layer, ObstacleMap};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actions::{joint_size, Actions};
use crate::config::{ConfigError, EnvConfig};
use crate::curriculum::{Curriculum, CurriculumUpdate};
use crate::metrics::StepMetrics;
use crate::termination::{Never, TerminalView, Termination};

const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<SniperEnv>();
    }
};

// ── EnvState ────────────────────────────────────────────────────

/// Lifecycle of a [`SniperEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvState {
    /// Built but never reset.
    Uninitialized,
    /// Reset, no step taken yet.
    Ready,
    /// At least one step taken this episode.
    Stepped,
    /// The termination predicate fired; only `reset()` is accepted.
    Terminal,
}

// ── StepOutcome ─────────────────────────────────────────────────

/// Bookkeeping returned alongside each step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    /// Steps taken this episode, including this one.
    pub tick: TickId,
    /// Targets captured by this step.
    pub targets_removed: usize,
    /// Snipers removed by this step (always zero).
    pub snipers_removed: usize,
    /// Per sniper: whether it took part in a capture this step.
    pub participation: Vec<bool>,
    /// Handles of the targets captured this step.
    pub captured: Vec<AgentHandle>,
    /// Timings and counters for this step.
    pub metrics: StepMetrics,
}

/// Result of a successful [`SniperEnv::step()`].
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// One observation per surveillance agent, copied out of the
    /// environment's buffers.
    pub observations: Vec<Vec<f32>>,
    /// One shared reward in global mode, one per agent in local mode.
    pub rewards: Vec<f32>,
    /// Whether the termination predicate fired.
    pub done: bool,
    /// Capture results and metrics.
    pub info: StepInfo,
}

// ── SniperEnvBuilder ────────────────────────────────────────────

/// Assembles a [`SniperEnv`] from a config, a map pool and the pluggable
/// behaviour that is not part of the serialized config.
///
/// # Examples
///
/// ```
/// use overwatch_engine::{EnvConfig, SniperEnvBuilder};
/// use overwatch_space::ObstacleMap;
///
/// let mut env = SniperEnvBuilder::new(EnvConfig::default())
///     .map(ObstacleMap::open(8, 8).unwrap())
///     .build()
///     .unwrap();
/// let obs = env.reset().unwrap();
/// assert_eq!(obs.len(), 1);
/// assert_eq!(obs[0].len(), 37);
/// ```
pub struct SniperEnvBuilder {
    config: EnvConfig,
    maps: Vec<ObstacleMap>,
    sniper_policy: Option<Box<dyn Policy>>,
    target_policy: Option<Box<dyn Policy>>,
    termination: Option<Box<dyn Termination>>,
}

impl SniperEnvBuilder {
    /// Start from `config` with an empty map pool.
    pub fn new(config: EnvConfig) -> Self {
        Self {
            config,
            maps: Vec::new(),
            sniper_policy: None,
            target_policy: None,
            termination: None,
        }
    }

    /// Add one map to the pool.
    pub fn map(mut self, map: ObstacleMap) -> Self {
        self.maps.push(map);
        self
    }

    /// Add several maps to the pool.
    pub fn maps(mut self, maps: impl IntoIterator<Item = ObstacleMap>) -> Self {
        self.maps.extend(maps);
        self
    }

    /// Controller for the sniper group. Defaults to [`RandomPolicy`].
    pub fn sniper_policy(mut self, policy: impl Policy + 'static) -> Self {
        self.sniper_policy = Some(Box::new(policy));
        self
    }

    /// Controller for the target group. Defaults to [`RandomPolicy`].
    pub fn target_policy(mut self, policy: impl Policy + 'static) -> Self {
        self.target_policy = Some(Box::new(policy));
        self
    }

    /// Episode end predicate. Defaults to [`Never`].
    pub fn termination(mut self, termination: impl Termination + 'static) -> Self {
        self.termination = Some(Box::new(termination));
        self
    }

    /// Validate everything and build an uninitialized environment.
    pub fn build(self) -> Result<SniperEnv, ConfigError> {
        self.config.validate(&self.maps)?;
        let extractor =
            WindowExtractor::new(self.config.obs_range, self.config.layer_normalization)?;

        let maps: Vec<Arc<ObstacleMap>> = self.maps.into_iter().map(Arc::new).collect();
        let first = Arc::clone(&maps[0]);
        let empty = |group| {
            AgentLayer::new(group, 0, Arc::clone(&first), Vec::new()).map_err(|source| {
                ConfigError::Placement {
                    group,
                    map: 0,
                    source,
                }
            })
        };

        let config = self.config;
        Ok(SniperEnv {
            grid: GridState::from_map(&first),
            surveillance: empty(AgentGroup::Surveillance)?,
            snipers: empty(AgentGroup::Sniper)?,
            targets: empty(AgentGroup::Target)?,
            extractor,
            rewards: RewardEvaluator::new(
                config.sniper_penalty,
                config.target_bonus,
                config.reward_mech,
            )
            .with_count(config.reward_count),
            capture: CaptureEngine::new(config.capture_policy()),
            layout: config.obs_layout(),
            sniper_policy: self
                .sniper_policy
                .unwrap_or_else(|| Box::new(RandomPolicy::default())),
            target_policy: self
                .target_policy
                .unwrap_or_else(|| Box::new(RandomPolicy::default())),
            termination: self.termination.unwrap_or_else(|| Box::new(Never)),
            curriculum: Curriculum::from_config(&config),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
            maps,
            map_index: 0,
            state: EnvState::Uninitialized,
            tick: TickId(0),
            episode: 0,
            captured_total: 0,
            last_metrics: StepMetrics::default(),
            config,
        })
    }
}

// ── SniperEnv ───────────────────────────────────────────────────

/// Multi-agent surveillance environment.
///
/// Surveillance agents are driven by the caller's actions; snipers and
/// targets by their policies. Not `Sync`: one instance per episode
/// stream.
pub struct SniperEnv {
    config: EnvConfig,
    maps: Vec<Arc<ObstacleMap>>,
    map_index: usize,
    grid: GridState,
    surveillance: AgentLayer,
    snipers: AgentLayer,
    targets: AgentLayer,
    extractor: WindowExtractor,
    rewards: RewardEvaluator,
    capture: CaptureEngine,
    layout: ObsLayout,
    sniper_policy: Box<dyn Policy>,
    target_policy: Box<dyn Policy>,
    termination: Box<dyn Termination>,
    curriculum: Curriculum,
    rng: ChaCha8Rng,
    seed: u64,
    state: EnvState,
    tick: TickId,
    episode: u32,
    captured_total: usize,
    last_metrics: StepMetrics,
}

impl SniperEnv {
    /// Start a new episode and return the initial observations.
    ///
    /// Picks a map (uniformly from the pool when `sample_maps` is set,
    /// map 0 otherwise), places all three groups, and rebuilds the grid.
    pub fn reset(&mut self) -> Result<Vec<Vec<f32>>, ConfigError> {
        self.map_index = if self.config.sample_maps {
            self.rng.gen_range(0..self.maps.len())
        } else {
            0
        };
        let map = Arc::clone(&self.maps[self.map_index]);
        let episode = self.episode;

        self.surveillance = self.spawn(AgentGroup::Surveillance, &map, episode)?;
        self.snipers = self.spawn(AgentGroup::Sniper, &map, episode)?;
        self.targets = self.spawn(AgentGroup::Target, &map, episode)?;

        self.grid = GridState::from_map(&map);
        self.refresh_agents();

        self.episode = self.episode.wrapping_add(1);
        self.tick = TickId(0);
        self.captured_total = 0;
        self.last_metrics = StepMetrics::default();
        self.state = EnvState::Ready;

        tracing::debug!(
            map = self.map_index,
            episode,
            surveillance = self.surveillance.n_agents(),
            snipers = self.snipers.n_agents(),
            targets = self.targets.n_agents(),
            seed = self.seed,
            "environment reset"
        );

        Ok(self
            .extractor
            .collect(&self.grid, &self.surveillance, self.layout)?)
    }

    /// Reseed the RNG with `seed`, then [`reset()`](Self::reset).
    pub fn reset_with_seed(&mut self, seed: u64) -> Result<Vec<Vec<f32>>, ConfigError> {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.reset()
    }

    fn spawn(
        &mut self,
        group: AgentGroup,
        map: &Arc<ObstacleMap>,
        episode: u32,
    ) -> Result<AgentLayer, ConfigError> {
        let (placement, count) = self.config.group(group);
        AgentLayer::spawn(
            group,
            episode,
            Arc::clone(map),
            placement,
            count,
            &mut self.rng,
        )
        .map_err(|source| ConfigError::Placement {
            group,
            map: self.map_index,
            source,
        })
    }

    fn refresh_agents(&mut self) {
        for layer in [&self.surveillance, &self.snipers, &self.targets] {
            self.grid
                .refresh_from(Layer::for_group(layer.group()), layer.live_positions());
        }
    }

    /// Advance the episode by one step.
    ///
    /// # Errors
    ///
    /// [`StepError::NotReady`] before the first reset,
    /// [`StepError::Terminal`] after a terminal step, and
    /// [`StepError::InvalidAction`] when `actions` does not fit the
    /// action space or a policy returns an out-of-range action. In every
    /// error case the agents, the tick and the RNG are unchanged; only a
    /// policy's own internal state may have advanced.
    pub fn step(&mut self, actions: impl Into<Actions>) -> Result<StepOutcome, StepError> {
        match self.state {
            EnvState::Uninitialized => return Err(StepError::NotReady),
            EnvState::Terminal => return Err(StepError::Terminal),
            EnvState::Ready | EnvState::Stepped => {}
        }
        let step_start = Instant::now();
        let mut metrics = StepMetrics::default();

        let directions = actions.into().decode(&self.act_dims())?;

        // 1. Pre-move rewards.
        let reward_start = Instant::now();
        let mut rewards =
            self.rewards
                .evaluate(&mut self.extractor, &self.grid, &self.surveillance)?;
        metrics.reward_us = reward_start.elapsed().as_micros() as u64;

        // 2. Policies decide from the pre-move grid; 3. everyone moves.
        // Draws go to a scratch RNG, committed once both groups validate.
        let movement_start = Instant::now();
        let mut rng = self.rng.clone();
        let sniper_moves = decide(&mut *self.sniper_policy, &self.snipers, &self.grid, &mut rng)?;
        let target_moves = decide(&mut *self.target_policy, &self.targets, &self.grid, &mut rng)?;
        self.rng = rng;
        for (i, direction) in directions.into_iter().enumerate() {
            self.surveillance.move_agent(i, direction);
        }
        for (i, direction) in sniper_moves {
            self.snipers.move_agent(i, direction);
        }
        for (i, direction) in target_moves {
            self.targets.move_agent(i, direction);
        }
        self.refresh_agents();
        metrics.movement_us = movement_start.elapsed().as_micros() as u64;

        // 4. Captures.
        let capture_start = Instant::now();
        let report = if self.config.remove_captured {
            let report = self
                .capture
                .resolve_captures(&self.grid, &self.snipers, &mut self.targets);
            if report.targets_removed > 0 {
                self.targets.compact();
                self.grid
                    .refresh_from(Layer::Targets, self.targets.live_positions());
            }
            report
        } else {
            CaptureReport {
                participation: vec![false; self.snipers.n_agents()],
                ..CaptureReport::default()
            }
        };
        self.captured_total += report.targets_removed;
        metrics.capture_us = capture_start.elapsed().as_micros() as u64;

        // 5. Observations, urgency, termination.
        let obs_start = Instant::now();
        let observations = self
            .extractor
            .collect(&self.grid, &self.surveillance, self.layout)?;
        metrics.observation_us = obs_start.elapsed().as_micros() as u64;

        let urgency = self.config.urgency_reward;
        rewards.iter_mut().for_each(|r| *r += urgency);
        let rewards = self.rewards.aggregate(rewards);

        self.tick = TickId(self.tick.0 + 1);
        let done = self.termination.is_terminal(&TerminalView {
            tick: self.tick,
            grid: &self.grid,
            surveillance: &self.surveillance,
            snipers: &self.snipers,
            targets: &self.targets,
            captured_total: self.captured_total,
        });
        self.state = if done {
            EnvState::Terminal
        } else {
            EnvState::Stepped
        };

        metrics.targets_live = self.targets.n_live();
        metrics.captures_total = self.captured_total;
        metrics.total_us = step_start.elapsed().as_micros() as u64;
        self.last_metrics = metrics.clone();

        tracing::trace!(
            tick = self.tick.0,
            reward = rewards.first().copied().unwrap_or_default(),
            captured = report.targets_removed,
            targets_live = metrics.targets_live,
            done,
            "step"
        );

        Ok(StepOutcome {
            observations,
            rewards,
            done,
            info: StepInfo {
                tick: self.tick,
                targets_removed: report.targets_removed,
                snipers_removed: report.snipers_removed,
                participation: report.participation,
                captured: report.captured,
                metrics,
            },
        })
    }

    /// Advance the curriculum to training iteration `itr`.
    ///
    /// Group size changes take effect at the next reset; disabling
    /// shaping takes effect immediately.
    pub fn update_curriculum(&mut self, itr: u64) -> CurriculumUpdate {
        let update = self.curriculum.update(
            itr,
            &mut self.config.n_snipers,
            &mut self.config.n_targets,
        );
        if update.shrunk {
            tracing::info!(
                itr,
                snipers = self.config.n_snipers,
                targets = self.config.n_targets,
                "curriculum shrank threat groups"
            );
        }
        if update.shaping_off && self.rewards.target_bonus() != 0.0 {
            self.rewards.set_target_bonus(0.0);
            self.config.target_bonus = 0.0;
            tracing::info!(itr, "curriculum turned off target shaping");
        }
        update
    }

    /// Replace the sniper controller.
    pub fn set_sniper_policy(&mut self, policy: impl Policy + 'static) {
        self.sniper_policy = Box::new(policy);
    }

    /// Replace the target controller.
    pub fn set_target_policy(&mut self, policy: impl Policy + 'static) {
        self.target_policy = Box::new(policy);
    }

    /// Replace the termination predicate.
    pub fn set_termination(&mut self, termination: impl Termination + 'static) {
        self.termination = Box::new(termination);
    }

    // ── Spaces ──────────────────────────────────────────────────

    /// Shape and bounds of one surveillance observation.
    pub fn observation_space(&self) -> ObsSpace {
        self.layout.space(self.config.obs_range)
    }

    /// Number of discrete actions per surveillance agent.
    pub fn action_space(&self) -> usize {
        N_ACTIONS
    }

    /// Action-space size of every surveillance agent, in agent order.
    pub fn act_dims(&self) -> Vec<usize> {
        vec![N_ACTIONS; self.config.n_surveillance]
    }

    /// Size of the joint action space accepted by [`Actions::Joint`].
    pub fn joint_action_space(&self) -> u64 {
        joint_size(&self.act_dims())
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Current configuration, including curriculum changes.
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Lifecycle state.
    pub fn state(&self) -> EnvState {
        self.state
    }

    /// Steps taken this episode.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    /// Seed the RNG was last seeded with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Episodes started so far.
    pub fn episodes(&self) -> u32 {
        self.episode
    }

    /// Pool index of the current map.
    pub fn map_index(&self) -> usize {
        self.map_index
    }

    /// Current grid state.
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Agent layer of `group`.
    pub fn agents(&self, group: AgentGroup) -> &AgentLayer {
        match group {
            AgentGroup::Surveillance => &self.surveillance,
            AgentGroup::Sniper => &self.snipers,
            AgentGroup::Target => &self.targets,
        }
    }

    /// Reward settings currently in force.
    pub fn reward_evaluator(&self) -> &RewardEvaluator {
        &self.rewards
    }

    /// Curriculum constraint window in `[0, 1]`.
    pub fn constraint_window(&self) -> f32 {
        self.curriculum.constraint_window()
    }

    /// Targets captured since the last reset.
    pub fn captured_total(&self) -> usize {
        self.captured_total
    }

    /// Metrics from the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}

/// Ask `policy` for an action for every live agent of `layer`.
fn decide(
    policy: &mut dyn Policy,
    layer: &AgentLayer,
    grid: &GridState,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<(usize, Direction)>, ActionError> {
    layer
        .live()
        .map(|(agent, _, _)| {
            let action = policy.act(grid, rng);
            Direction::from_index(action)
                .map(|d| (agent, d))
                .ok_or(ActionError::InvalidAction {
                    agent,
                    action,
                    n_actions: N_ACTIONS,
                })
        })
        .collect()
}

impl std::fmt::Debug for SniperEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SniperEnv")
            .field("state", &self.state)
            .field("tick", &self.tick)
            .field("episode", &self.episode)
            .field("map_index", &self.map_index)
            .field("seed", &self.seed)
            .field("sniper_policy", &self.sniper_policy.name())
            .field("target_policy", &self.target_policy.name())
            .field("termination", &self.termination.name())
            .finish()
    }
}
