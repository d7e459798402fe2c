//! Policy fixtures for engine tests.
//!
//! - [`ScriptedPolicy`] replays a fixed action sequence, then stays.
//! - [`CountingPolicy`] stays put and counts how often it was asked.

use overwatch_agents::{Direction, Policy};
use overwatch_space::GridState;
use rand::RngCore;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Replays `actions` one per call; once exhausted, always stays.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPolicy {
    actions: VecDeque<usize>,
}

impl ScriptedPolicy {
    pub fn new(actions: impl IntoIterator<Item = usize>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl Policy for ScriptedPolicy {
    fn act(&mut self, _grid: &GridState, _rng: &mut dyn RngCore) -> usize {
        self.actions
            .pop_front()
            .unwrap_or_else(|| Direction::Stay.index())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Always stays; the shared counter records every `act` call.
#[derive(Clone, Debug, Default)]
pub struct CountingPolicy {
    pub calls: Arc<AtomicUsize>,
}

impl CountingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Policy for CountingPolicy {
    fn act(&mut self, _grid: &GridState, _rng: &mut dyn RngCore) -> usize {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Direction::Stay.index()
    }

    fn name(&self) -> &str {
        "counting"
    }
}
