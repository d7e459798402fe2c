//! Training curriculum: shrink the threat over time and switch off
//! reward shaping.

use crate::config::EnvConfig;

/// What a curriculum update changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurriculumUpdate {
    /// One sniper and one target were dropped from future resets.
    pub shrunk: bool,
    /// The target bonus should now be zero.
    pub shaping_off: bool,
}

/// Iteration-driven schedule over the environment's settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Curriculum {
    constraint_window: f32,
    constrain_rate: f32,
    remove_every: u64,
    turn_off_shaping: Option<u64>,
}

/// Groups only shrink while there are more snipers than this.
const MIN_SNIPERS: usize = 4;

impl Curriculum {
    /// Schedule described by the curriculum fields of `config`.
    pub fn from_config(config: &EnvConfig) -> Self {
        Self {
            constraint_window: config.constraint_window.clamp(0.0, 1.0),
            constrain_rate: config.curriculum_constrain_rate,
            remove_every: config.curriculum_remove_every.max(1),
            turn_off_shaping: config.curriculum_turn_off_shaping,
        }
    }

    /// Current constraint window in `[0, 1]`.
    pub fn constraint_window(&self) -> f32 {
        self.constraint_window
    }

    /// Advance the schedule to training iteration `itr`.
    ///
    /// Widens the constraint window by the constrain rate; every
    /// `remove_every` iterations (never at 0) drops one sniper and one
    /// target while more than four snipers remain; once `itr` passes the
    /// shaping cutoff, reports that the target bonus should be zero.
    pub fn update(&mut self, itr: u64, n_snipers: &mut usize, n_targets: &mut usize) -> CurriculumUpdate {
        self.constraint_window = (self.constraint_window + self.constrain_rate).clamp(0.0, 1.0);

        let mut update = CurriculumUpdate::default();
        if itr != 0 && itr % self.remove_every == 0 && *n_snipers > MIN_SNIPERS {
            *n_snipers -= 1;
            *n_targets = n_targets.saturating_sub(1);
            update.shrunk = true;
        }
        if self.turn_off_shaping.is_some_and(|cutoff| itr > cutoff) {
            update.shaping_off = true;
        }
        update
    }
}
