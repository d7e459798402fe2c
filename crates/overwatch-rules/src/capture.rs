//! Capture resolution: which targets have the snipers caught.

use indexmap::IndexSet;
use overwatch_agents::AgentLayer;
use overwatch_core::{AgentHandle, Position};
use overwatch_space::{GridState, Layer, CARDINAL_OFFSETS};
use serde::{Deserialize, Serialize};

/// Rule deciding when a target is caught.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePolicy {
    /// Every capturable cardinal neighbour of the target holds a sniper.
    #[default]
    Surround,
    /// At least `catch_threshold` snipers share the target's cell.
    Threshold {
        /// Snipers needed on the target's cell.
        catch_threshold: u32,
    },
}

/// Number of snipers needed to surround a target at `pos`.
///
/// Counts the cardinal neighbours a sniper could stand on: four, minus
/// one per axis on which `pos` touches the boundary, minus one per
/// neighbour that is an obstacle. Corners therefore need 2 and an
/// obstacle-free edge cell needs 3. Computed as the number of in-bounds
/// free neighbours, which agrees with that count on any grid at least
/// two cells wide along both axes.
pub fn need_to_surround(grid: &GridState, pos: Position) -> usize {
    grid.dims()
        .neighbours(pos)
        .into_iter()
        .filter(|n| !grid.is_obstacle(*n))
        .count()
}

/// Outcome of one capture pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureReport {
    /// Targets captured by this pass.
    pub targets_removed: usize,
    /// Snipers removed by this pass. Snipers are never captured, so this
    /// stays zero; it is reported for parity with `targets_removed`.
    pub snipers_removed: usize,
    /// Per sniper index: whether it took part in a capture this pass.
    pub participation: Vec<bool>,
    /// Indices to pass, in order, to [`AgentLayer::remove_agent`] to
    /// remove the captured targets one at a time. Each entry is already
    /// shifted down by the number of removals before it.
    pub removal_order: Vec<usize>,
    /// Handles of the captured targets, in index order.
    pub captured: Vec<AgentHandle>,
}

impl CaptureReport {
    /// Number of snipers that took part in a capture.
    pub fn participants(&self) -> usize {
        self.participation.iter().filter(|p| **p).count()
    }
}

/// Applies a [`CapturePolicy`] to the current grid.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use overwatch_agents::AgentLayer;
/// use overwatch_core::{AgentGroup, Position};
/// use overwatch_rules::{CaptureEngine, CapturePolicy};
/// use overwatch_space::{GridState, Layer, ObstacleMap};
///
/// let map = Arc::new(ObstacleMap::open(5, 5).unwrap());
/// let snipers = AgentLayer::new(
///     AgentGroup::Sniper, 0, map.clone(),
///     vec![Position::new(1, 0), Position::new(0, 1)],
/// ).unwrap();
/// let mut targets = AgentLayer::new(
///     AgentGroup::Target, 0, map.clone(), vec![Position::new(0, 0)],
/// ).unwrap();
/// let mut grid = GridState::from_map(&map);
/// grid.refresh(Layer::Snipers, &snipers.state_matrix()).unwrap();
///
/// let engine = CaptureEngine::new(CapturePolicy::Surround);
/// let report = engine.resolve_captures(&grid, &snipers, &mut targets);
/// assert_eq!(report.targets_removed, 1);
/// assert_eq!(report.participation, vec![true, true]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureEngine {
    policy: CapturePolicy,
}

impl CaptureEngine {
    /// Create an engine applying `policy`.
    pub fn new(policy: CapturePolicy) -> Self {
        Self { policy }
    }

    /// The policy in force.
    pub fn policy(&self) -> CapturePolicy {
        self.policy
    }

    /// Test every live target and tombstone the captured ones.
    ///
    /// `grid` must hold the sniper occupancy of `snipers`. Targets
    /// already tombstoned are skipped, so a second call without an
    /// intervening move captures nothing new. The caller compacts
    /// `targets` when it is done with the pre-compaction indices.
    pub fn resolve_captures(
        &self,
        grid: &GridState,
        snipers: &AgentLayer,
        targets: &mut AgentLayer,
    ) -> CaptureReport {
        let mut report = CaptureReport {
            participation: vec![false; snipers.n_agents()],
            ..CaptureReport::default()
        };

        let live: Vec<(usize, AgentHandle, Position)> = targets.live().collect();
        for (index, handle, pos) in live {
            let Some(catchers) = self.catching_cells(grid, pos) else {
                continue;
            };
            for (j, _, sniper_pos) in snipers.live() {
                if catchers.contains(&sniper_pos) {
                    report.participation[j] = true;
                }
            }
            targets.mark_removed(handle);
            report.removal_order.push(index - report.targets_removed);
            report.captured.push(handle);
            report.targets_removed += 1;
            tracing::debug!(
                handle = %handle,
                position = %pos,
                catchers = catchers.len(),
                "target captured"
            );
        }
        report
    }

    /// Cells whose snipers catch a target at `pos`, or `None` if it is
    /// not caught.
    fn catching_cells(&self, grid: &GridState, pos: Position) -> Option<IndexSet<Position>> {
        match self.policy {
            CapturePolicy::Surround => {
                let required = need_to_surround(grid, pos);
                if required == 0 {
                    return None;
                }
                let occupied: IndexSet<Position> = CARDINAL_OFFSETS
                    .iter()
                    .map(|&(dx, dy)| pos.offset(dx, dy))
                    .filter(|n| grid.occupancy(Layer::Snipers, *n) > 0.0)
                    .collect();
                (occupied.len() == required).then_some(occupied)
            }
            CapturePolicy::Threshold { catch_threshold } => {
                let here = grid.occupancy(Layer::Snipers, pos);
                (here >= catch_threshold as f32).then(|| IndexSet::from([pos]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overwatch_core::AgentGroup;
    use overwatch_test_utils::GridBuilder;
    use proptest::prelude::*;

    fn resolve(b: &GridBuilder, policy: CapturePolicy) -> (CaptureReport, AgentLayer) {
        let grid = b.grid();
        let snipers = b.layer(AgentGroup::Sniper);
        let mut targets = b.layer(AgentGroup::Target);
        let report = CaptureEngine::new(policy).resolve_captures(&grid, &snipers, &mut targets);
        (report, targets)
    }

    #[test]
    fn need_to_surround_interior_corner_edge() {
        let grid = GridBuilder::open(5, 5).grid();
        assert_eq!(need_to_surround(&grid, Position::new(2, 2)), 4);
        assert_eq!(need_to_surround(&grid, Position::new(0, 0)), 2);
        assert_eq!(need_to_surround(&grid, Position::new(4, 0)), 2);
        assert_eq!(need_to_surround(&grid, Position::new(0, 2)), 3);

        let walled = GridBuilder::open(5, 5).obstacle((1, 2)).grid();
        assert_eq!(need_to_surround(&walled, Position::new(0, 2)), 2);
        assert_eq!(need_to_surround(&walled, Position::new(2, 2)), 3);
    }

    #[test]
    fn four_snipers_surround_interior_target() {
        let b = GridBuilder::open(5, 5)
            .target((2, 2))
            .snipers(&[(1, 2), (3, 2), (2, 1), (2, 3)]);
        let (report, targets) = resolve(&b, CapturePolicy::Surround);
        assert_eq!(report.targets_removed, 1);
        assert_eq!(report.snipers_removed, 0);
        assert_eq!(report.participation, vec![true; 4]);
        assert_eq!(report.removal_order, vec![0]);
        assert!(targets.is_removed(0));
    }

    #[test]
    fn three_snipers_do_not_surround_interior_target() {
        let b = GridBuilder::open(5, 5)
            .target((2, 2))
            .snipers(&[(1, 2), (3, 2), (2, 1), (0, 0)]);
        let (report, targets) = resolve(&b, CapturePolicy::Surround);
        assert_eq!(report.targets_removed, 0);
        assert_eq!(report.participation, vec![false; 4]);
        assert!(!targets.is_removed(0));
    }

    #[test]
    fn corner_target_needs_two() {
        let b = GridBuilder::open(5, 5)
            .target((0, 0))
            .snipers(&[(1, 0), (0, 1), (3, 3)]);
        let (report, _) = resolve(&b, CapturePolicy::Surround);
        assert_eq!(report.targets_removed, 1);
        assert_eq!(report.participation, vec![true, true, false]);
    }

    #[test]
    fn obstacle_reduces_requirement() {
        let b = GridBuilder::open(5, 5)
            .obstacle((1, 2))
            .target((0, 2))
            .snipers(&[(0, 1), (0, 3)]);
        let (report, _) = resolve(&b, CapturePolicy::Surround);
        assert_eq!(report.targets_removed, 1);
    }

    #[test]
    fn stacked_snipers_count_one_cell() {
        let b = GridBuilder::open(5, 5)
            .target((0, 0))
            .snipers(&[(1, 0), (1, 0)]);
        let (report, _) = resolve(&b, CapturePolicy::Surround);
        assert_eq!(report.targets_removed, 0);
    }

    #[test]
    fn boxed_in_target_is_never_captured() {
        let b = GridBuilder::ascii(&[".#", "#."]).target((0, 0));
        let (report, _) = resolve(&b, CapturePolicy::Surround);
        assert_eq!(report.targets_removed, 0);
    }

    #[test]
    fn threshold_counts_colocated_snipers() {
        let policy = CapturePolicy::Threshold { catch_threshold: 2 };
        let b = GridBuilder::open(4, 4)
            .target((1, 1))
            .target((3, 3))
            .snipers(&[(1, 1), (1, 1), (3, 3), (2, 3)]);
        let (report, targets) = resolve(&b, policy);
        assert_eq!(report.targets_removed, 1);
        assert_eq!(report.participation, vec![true, true, false, false]);
        assert!(targets.is_removed(0));
        assert!(!targets.is_removed(1));
    }

    #[test]
    fn removal_order_accounts_for_earlier_removals() {
        let b = GridBuilder::open(6, 6)
            .target((0, 0))
            .target((3, 3))
            .target((5, 5))
            .snipers(&[(1, 0), (0, 1), (4, 5), (5, 4)]);
        let (report, mut targets) = resolve(&b, CapturePolicy::Surround);
        assert_eq!(report.removal_order, vec![0, 1]);
        let expected = report.captured.clone();
        let survivor = targets.handle(1).unwrap();

        let mut sequential = b.layer(AgentGroup::Target);
        for &i in &report.removal_order {
            sequential.remove_agent(i);
        }
        assert_eq!(sequential.handle(0), Some(survivor));
        assert_eq!(targets.compact(), expected);
        assert_eq!(targets.handle(0), Some(survivor));
    }

    #[test]
    fn second_pass_is_idempotent() {
        let b = GridBuilder::open(5, 5)
            .target((2, 2))
            .snipers(&[(1, 2), (3, 2), (2, 1), (2, 3)]);
        let grid = b.grid();
        let snipers = b.layer(AgentGroup::Sniper);
        let mut targets = b.layer(AgentGroup::Target);
        let engine = CaptureEngine::default();
        assert_eq!(
            engine.resolve_captures(&grid, &snipers, &mut targets).targets_removed,
            1
        );
        let again = engine.resolve_captures(&grid, &snipers, &mut targets);
        assert_eq!(again.targets_removed, 0);
        assert!(again.captured.is_empty());
        assert_eq!(targets.n_live(), 0);
    }

    proptest! {
        #[test]
        fn surround_requirement_matches_boundary_formula(
            xs in 2u32..8,
            ys in 2u32..8,
            x in 0i32..8,
            y in 0i32..8,
            walls in proptest::collection::vec((0i32..8, 0i32..8), 0..6),
        ) {
            let mut b = GridBuilder::open(xs, ys);
            for &(wx, wy) in &walls {
                if wx < xs as i32 && wy < ys as i32 {
                    b = b.obstacle((wx, wy));
                }
            }
            let grid = b.grid();
            let pos = Position::new(x, y);
            prop_assume!(grid.dims().contains(pos));

            let mut expected = 4usize;
            if x == 0 || x == xs as i32 - 1 {
                expected -= 1;
            }
            if y == 0 || y == ys as i32 - 1 {
                expected -= 1;
            }
            expected -= grid
                .dims()
                .neighbours(pos)
                .iter()
                .filter(|n| grid.is_obstacle(**n))
                .count();
            prop_assert_eq!(need_to_surround(&grid, pos), expected);
        }
    }
}
