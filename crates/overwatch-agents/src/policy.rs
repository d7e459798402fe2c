//! Controller policies for the non-learning agent groups.

use crate::action::{Direction, N_ACTIONS};
use overwatch_space::GridState;
use rand::{Rng, RngCore};

/// Chooses an action index for one agent from the full grid state.
///
/// Snipers and targets are moved by a policy each step, one call per
/// live agent, in index order. Policies draw randomness from the RNG
/// passed in, never from their own source, so seeded environments stay
/// reproducible.
pub trait Policy: Send {
    /// Return an action index in `0..N_ACTIONS`.
    fn act(&mut self, grid: &GridState, rng: &mut dyn RngCore) -> usize;

    /// Short name for logging.
    fn name(&self) -> &str {
        "policy"
    }
}

/// Uniformly random actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomPolicy {
    n_actions: usize,
}

impl RandomPolicy {
    /// A policy sampling uniformly from `0..n_actions`.
    ///
    /// `n_actions` is clamped to at least one.
    pub fn new(n_actions: usize) -> Self {
        Self {
            n_actions: n_actions.max(1),
        }
    }

    /// Size of the sampled action range.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new(N_ACTIONS)
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _grid: &GridState, rng: &mut dyn RngCore) -> usize {
        rng.gen_range(0..self.n_actions)
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Always stays in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StationaryPolicy;

impl Policy for StationaryPolicy {
    fn act(&mut self, _grid: &GridState, _rng: &mut dyn RngCore) -> usize {
        Direction::Stay.index()
    }

    fn name(&self) -> &str {
        "stationary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overwatch_space::GridDims;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid() -> GridState {
        GridState::new(GridDims::new(3, 3).unwrap())
    }

    #[test]
    fn random_policy_covers_action_space() {
        let g = grid();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut p = RandomPolicy::default();
        let mut seen = [false; N_ACTIONS];
        for _ in 0..500 {
            let a = p.act(&g, &mut rng);
            assert!(a < N_ACTIONS);
            seen[a] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn random_policy_is_reproducible() {
        let g = grid();
        let mut p = RandomPolicy::default();
        let run = |p: &mut RandomPolicy| {
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            (0..20).map(|_| p.act(&g, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(&mut p), run(&mut p));
        assert_eq!(RandomPolicy::new(0).n_actions(), 1);
    }

    #[test]
    fn stationary_policy_stays() {
        let g = grid();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut p: Box<dyn Policy> = Box::new(StationaryPolicy);
        assert_eq!(p.act(&g, &mut rng), Direction::Stay.index());
        assert_eq!(p.name(), "stationary");
    }
}
