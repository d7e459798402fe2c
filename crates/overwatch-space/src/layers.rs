//! The layered Grid State shared by observation and capture logic.

use crate::error::GridError;
use crate::grid::GridDims;
use crate::map::{ObstacleMap, OBSTACLE_VALUE};
use overwatch_core::{AgentGroup, Position};

/// Number of stacked layers in a [`GridState`].
pub const LAYER_COUNT: usize = 5;

/// One layer of the Grid State.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Static obstacle map: `0.0` free, `-1.0` blocked.
    Obstacles = 0,
    /// Sniper occupancy count per cell.
    Snipers = 1,
    /// Target occupancy count per cell.
    Targets = 2,
    /// Surveillance occupancy count per cell.
    Surveillance = 3,
    /// Unused by the environment; free for controllers to annotate.
    Scratch = 4,
}

impl Layer {
    /// All layers in storage order.
    pub const ALL: [Layer; LAYER_COUNT] = [
        Layer::Obstacles,
        Layer::Snipers,
        Layer::Targets,
        Layer::Surveillance,
        Layer::Scratch,
    ];

    /// The occupancy layer of an agent group.
    pub fn for_group(group: AgentGroup) -> Layer {
        match group {
            AgentGroup::Sniper => Layer::Snipers,
            AgentGroup::Target => Layer::Targets,
            AgentGroup::Surveillance => Layer::Surveillance,
        }
    }
}

/// A stack of [`LAYER_COUNT`] layers, each `xs × ys`, stored x-major.
///
/// The obstacle layer is written once per map selection. The three
/// occupancy layers are only ever replaced wholesale from an agent
/// layer's occupancy matrix through [`refresh`](Self::refresh); no
/// cell-level mutation is exposed for them.
#[derive(Clone, Debug, PartialEq)]
pub struct GridState {
    dims: GridDims,
    data: Vec<f32>,
}

impl GridState {
    /// An all-zero grid state (no obstacles, no agents).
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            data: vec![0.0; LAYER_COUNT * dims.cell_count()],
        }
    }

    /// A grid state whose obstacle layer is `map` and whose other
    /// layers are zero.
    pub fn from_map(map: &ObstacleMap) -> Self {
        let mut state = Self::new(map.dims());
        state.layer_mut(Layer::Obstacles).copy_from_slice(&map.layer_values());
        state
    }

    /// Grid extent.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Read one layer as a flat slice.
    pub fn layer(&self, layer: Layer) -> &[f32] {
        let n = self.dims.cell_count();
        let start = layer as usize * n;
        &self.data[start..start + n]
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut [f32] {
        let n = self.dims.cell_count();
        let start = layer as usize * n;
        &mut self.data[start..start + n]
    }

    /// Replace the obstacle layer with `map`.
    pub fn set_obstacles(&mut self, map: &ObstacleMap) -> Result<(), GridError> {
        if map.dims() != self.dims {
            return Err(GridError::LayerSizeMismatch {
                expected: self.dims.cell_count(),
                got: map.dims().cell_count(),
            });
        }
        self.layer_mut(Layer::Obstacles)
            .copy_from_slice(&map.layer_values());
        Ok(())
    }

    /// Overwrite an occupancy layer with a full occupancy matrix.
    ///
    /// Fails with [`GridError::ObstacleLayerReadOnly`] for
    /// [`Layer::Obstacles`], which changes only with the map.
    pub fn refresh(&mut self, layer: Layer, occupancy: &[f32]) -> Result<(), GridError> {
        if layer == Layer::Obstacles {
            return Err(GridError::ObstacleLayerReadOnly);
        }
        let n = self.dims.cell_count();
        if occupancy.len() != n {
            return Err(GridError::LayerSizeMismatch {
                expected: n,
                got: occupancy.len(),
            });
        }
        self.layer_mut(layer).copy_from_slice(occupancy);
        Ok(())
    }

    /// Rebuild an occupancy layer by counting `positions`.
    ///
    /// Equivalent to [`refresh`](Self::refresh) with the matching
    /// occupancy matrix. Off-grid positions are ignored, and so is a
    /// request to rebuild [`Layer::Obstacles`].
    pub fn refresh_from<I>(&mut self, layer: Layer, positions: I)
    where
        I: IntoIterator<Item = Position>,
    {
        if layer == Layer::Obstacles {
            return;
        }
        let dims = self.dims;
        let out = self.layer_mut(layer);
        out.fill(0.0);
        for pos in positions {
            if let Some(i) = dims.index(pos) {
                out[i] += 1.0;
            }
        }
    }

    /// Mutable access to the scratch layer.
    pub fn scratch_mut(&mut self) -> &mut [f32] {
        self.layer_mut(Layer::Scratch)
    }

    /// Value of `layer` at `pos`, or `None` off the grid.
    pub fn get(&self, layer: Layer, pos: Position) -> Option<f32> {
        self.dims.index(pos).map(|i| self.layer(layer)[i])
    }

    /// Whether `pos` is an in-bounds obstacle cell.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.get(Layer::Obstacles, pos) == Some(OBSTACLE_VALUE)
    }

    /// Occupancy count of `layer` at `pos`; zero off the grid.
    pub fn occupancy(&self, layer: Layer, pos: Position) -> f32 {
        self.get(layer, pos).unwrap_or(0.0)
    }

    /// Positions with a nonzero value in `layer`, in flat-index order.
    pub fn occupied(&self, layer: Layer) -> Vec<Position> {
        self.layer(layer)
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, _)| self.dims.position(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_map_fills_only_layer_zero() {
        let map = ObstacleMap::from_ascii(&["#..", "..."]).unwrap();
        let g = GridState::from_map(&map);
        assert_eq!(g.layer(Layer::Obstacles)[0], OBSTACLE_VALUE);
        assert!(g.is_obstacle(Position::new(0, 0)));
        for layer in &Layer::ALL[1..] {
            assert!(g.layer(*layer).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn refresh_replaces_occupancy_layer() {
        let dims = GridDims::new(2, 2).unwrap();
        let mut g = GridState::new(dims);
        g.refresh(Layer::Snipers, &[0.0, 2.0, 0.0, 1.0]).unwrap();
        assert_eq!(g.occupancy(Layer::Snipers, Position::new(0, 1)), 2.0);
        assert_eq!(
            g.occupied(Layer::Snipers),
            vec![Position::new(0, 1), Position::new(1, 1)]
        );
        g.refresh(Layer::Snipers, &[0.0; 4]).unwrap();
        assert!(g.occupied(Layer::Snipers).is_empty());
        assert!(g.refresh(Layer::Targets, &[0.0; 3]).is_err());
    }

    #[test]
    fn refresh_from_counts_positions() {
        let dims = GridDims::new(2, 2).unwrap();
        let mut by_matrix = GridState::new(dims);
        by_matrix.refresh(Layer::Targets, &[2.0, 0.0, 0.0, 1.0]).unwrap();
        let mut by_positions = GridState::new(dims);
        by_positions.refresh_from(Layer::Targets, [Position::new(1, 1), Position::new(5, 5)]);
        by_positions.refresh_from(
            Layer::Targets,
            [Position::new(0, 0), Position::new(1, 1), Position::new(0, 0)],
        );
        assert_eq!(by_positions, by_matrix);
    }

    #[test]
    fn obstacle_layer_cannot_be_refreshed() {
        let map = ObstacleMap::from_ascii(&["#.", ".."]).unwrap();
        let mut g = GridState::from_map(&map);
        assert_eq!(
            g.refresh(Layer::Obstacles, &[0.0; 4]),
            Err(GridError::ObstacleLayerReadOnly)
        );
        g.refresh_from(Layer::Obstacles, [Position::new(1, 1)]);
        assert_eq!(g.layer(Layer::Obstacles), map.layer_values().as_slice());
    }

    #[test]
    fn layers_do_not_alias() {
        let dims = GridDims::new(2, 3).unwrap();
        let mut g = GridState::new(dims);
        g.refresh(Layer::Targets, &[1.0; 6]).unwrap();
        assert!(g.layer(Layer::Snipers).iter().all(|&v| v == 0.0));
        assert!(g.layer(Layer::Surveillance).iter().all(|&v| v == 0.0));
        g.scratch_mut()[0] = 7.0;
        assert_eq!(g.get(Layer::Scratch, Position::new(0, 0)), Some(7.0));
    }

    #[test]
    fn set_obstacles_rejects_other_dims() {
        let mut g = GridState::new(GridDims::new(2, 2).unwrap());
        let other = ObstacleMap::open(3, 3).unwrap();
        assert!(g.set_obstacles(&other).is_err());
        let same = ObstacleMap::open(2, 2).unwrap().with_obstacle(Position::new(1, 0)).unwrap();
        g.set_obstacles(&same).unwrap();
        assert!(g.is_obstacle(Position::new(1, 0)));
    }

    #[test]
    fn off_grid_reads() {
        let g = GridState::new(GridDims::new(2, 2).unwrap());
        assert_eq!(g.get(Layer::Targets, Position::new(2, 0)), None);
        assert_eq!(g.occupancy(Layer::Targets, Position::new(2, 0)), 0.0);
        assert!(!g.is_obstacle(Position::new(-1, -1)));
    }

    #[test]
    fn group_layers_skip_obstacles() {
        let layers = [AgentGroup::Sniper, AgentGroup::Target, AgentGroup::Surveillance]
            .map(|g| Layer::for_group(g) as usize);
        assert_eq!(layers, [1, 2, 3]);
    }
}
