//! Local observation windows and their extractor.

use crate::geometry::{is_interior, WindowClip};
use crate::layout::ObsLayout;
use overwatch_agents::AgentLayer;
use overwatch_core::{ObsError, Position};
use overwatch_space::{GridState, Layer};

/// Channels in a [`LocalWindow`]: four grid layers plus identity.
pub const WINDOW_CHANNELS: usize = 5;

/// Channels copied from the Grid State (layers 0 to 3).
pub const GRID_CHANNELS: usize = 4;

/// Index of the identity channel.
pub const ID_CHANNEL: usize = 4;

/// One agent's `(5, obs_range, obs_range)` view, stored channel-major
/// then x-major.
///
/// Channels 0 to 3 hold `|layer| / layer_norm` for the obstacle, sniper,
/// target and surveillance layers. Off-grid cells read `1 / layer_norm`
/// in channel 0 (the same value as an obstacle) and `0` elsewhere.
/// Channel 4 is zero except its centre, which holds the agent's identity
/// scalar.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalWindow {
    obs_range: usize,
    data: Vec<f32>,
}

impl LocalWindow {
    /// An all-zero window.
    pub fn new(obs_range: u32) -> Self {
        let r = obs_range as usize;
        Self {
            obs_range: r,
            data: vec![0.0; WINDOW_CHANNELS * r * r],
        }
    }

    /// Side length.
    pub fn obs_range(&self) -> usize {
        self.obs_range
    }

    /// All five channels, channel-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// One channel as an `obs_range × obs_range` x-major slice.
    pub fn channel(&self, channel: usize) -> &[f32] {
        let n = self.obs_range * self.obs_range;
        &self.data[channel * n..(channel + 1) * n]
    }

    /// Value at window cell `(wx, wy)` of `channel`.
    pub fn get(&self, channel: usize, wx: usize, wy: usize) -> f32 {
        self.channel(channel)[wx * self.obs_range + wy]
    }

    /// The identity scalar stored at the window centre.
    pub fn identity(&self) -> f32 {
        let c = self.obs_range / 2;
        self.get(ID_CHANNEL, c, c)
    }

    /// Number of nonzero cells in `channel`.
    pub fn count_nonzero(&self, channel: usize) -> usize {
        self.channel(channel).iter().filter(|v| **v != 0.0).count()
    }

    /// The four grid channels in order, then the identity scalar if
    /// `include_id`.
    pub fn flatten(&self, include_id: bool) -> Vec<f32> {
        let n = self.obs_range * self.obs_range;
        let mut out = Vec::with_capacity(GRID_CHANNELS * n + usize::from(include_id));
        out.extend_from_slice(&self.data[..GRID_CHANNELS * n]);
        if include_id {
            out.push(self.identity());
        }
        out
    }

    fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let n = self.obs_range * self.obs_range;
        &mut self.data[channel * n..(channel + 1) * n]
    }
}

/// Element count of a five-channel window, `None` on overflow.
fn window_len(obs_range: u32) -> Option<usize> {
    let r = usize::try_from(obs_range).ok()?;
    WINDOW_CHANNELS.checked_mul(r)?.checked_mul(r)
}

/// Fills reusable per-agent [`LocalWindow`] buffers from a [`GridState`].
///
/// [`extract`](Self::extract) overwrites the buffer for one agent slot
/// and lends it out; the next extraction for that slot overwrites it
/// again. [`collect`](Self::collect) copies every window out, so its
/// result stays valid across later steps.
///
/// # Examples
///
/// ```
/// use overwatch_obs::WindowExtractor;
/// use overwatch_space::{GridState, ObstacleMap};
/// use overwatch_core::Position;
///
/// let map = ObstacleMap::open(5, 5).unwrap();
/// let grid = GridState::from_map(&map);
/// let mut extractor = WindowExtractor::new(3, 10.0).unwrap();
///
/// let window = extractor.extract(&grid, Position::new(0, 0), 0, 0.0).unwrap();
/// // The off-grid corner reads as a wall.
/// assert_eq!(window.get(0, 0, 0), 0.1);
/// assert_eq!(window.get(0, 1, 1), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct WindowExtractor {
    obs_range: u32,
    layer_norm: f32,
    buffers: Vec<LocalWindow>,
}

impl WindowExtractor {
    /// Create an extractor for windows of size `obs_range`.
    ///
    /// `obs_range` must be odd with a representable window size, and
    /// `layer_norm` finite and positive.
    pub fn new(obs_range: u32, layer_norm: f32) -> Result<Self, ObsError> {
        if obs_range == 0 || obs_range % 2 == 0 {
            return Err(ObsError::InvalidWindow {
                reason: format!("obs_range must be odd, got {obs_range}"),
            });
        }
        if obs_range > i32::MAX as u32 || window_len(obs_range).is_none() {
            return Err(ObsError::InvalidWindow {
                reason: format!("obs_range {obs_range} is too large to allocate"),
            });
        }
        if !layer_norm.is_finite() || layer_norm <= 0.0 {
            return Err(ObsError::InvalidWindow {
                reason: format!("layer normalization must be finite and positive, got {layer_norm}"),
            });
        }
        Ok(Self {
            obs_range,
            layer_norm,
            buffers: Vec::new(),
        })
    }

    /// Window side length.
    pub fn obs_range(&self) -> u32 {
        self.obs_range
    }

    /// Normalization divisor applied to every copied cell.
    pub fn layer_norm(&self) -> f32 {
        self.layer_norm
    }

    /// Number of per-agent buffers allocated so far.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Extract the window centred on `center` into buffer `slot`.
    pub fn extract(
        &mut self,
        grid: &GridState,
        center: Position,
        slot: usize,
        identity: f32,
    ) -> Result<&LocalWindow, ObsError> {
        let dims = grid.dims();
        if !dims.contains(center) {
            return Err(ObsError::PositionOutOfBounds { position: center });
        }
        let obs_range = self.obs_range;
        if self.buffers.len() <= slot {
            self.buffers
                .resize_with(slot + 1, || LocalWindow::new(obs_range));
        }
        let r = obs_range as usize;
        let ys = dims.ys() as usize;
        let norm = self.layer_norm;
        let clip = WindowClip::new(center, obs_range, dims);
        let window = &mut self.buffers[slot];

        // Interior windows overwrite every grid cell, so only the
        // identity channel needs clearing.
        if is_interior(center, obs_range, dims) {
            window.channel_mut(ID_CHANNEL).fill(0.0);
        } else {
            window.channel_mut(0).fill(1.0 / norm);
            window.data[r * r..].fill(0.0);
        }

        for (c, layer) in Layer::ALL[..GRID_CHANNELS].iter().enumerate() {
            let src = grid.layer(*layer);
            let dst = window.channel_mut(c);
            for (sx, dx) in clip.src_x.clone().zip(clip.dst_x.clone()) {
                let row = &src[sx * ys + clip.src_y.start..sx * ys + clip.src_y.end];
                let out = &mut dst[dx * r + clip.dst_y.start..dx * r + clip.dst_y.end];
                for (o, v) in out.iter_mut().zip(row) {
                    *o = v.abs() / norm;
                }
            }
        }

        let centre = r / 2;
        window.channel_mut(ID_CHANNEL)[centre * r + centre] = identity;
        Ok(&self.buffers[slot])
    }

    /// Extract the window of agent `index` in `agents`, tagging it with
    /// `index / n_agents` as its identity.
    pub fn extract_agent(
        &mut self,
        grid: &GridState,
        agents: &AgentLayer,
        index: usize,
    ) -> Result<&LocalWindow, ObsError> {
        let n = agents.n_agents();
        let position = agents
            .position(index)
            .ok_or(ObsError::AgentIndexOutOfRange { index, len: n })?;
        let identity = index as f32 / n as f32;
        self.extract(grid, position, index, identity)
    }

    /// Observations for every agent of `agents` in index order, copied
    /// out in the shape `layout` selects.
    pub fn collect(
        &mut self,
        grid: &GridState,
        agents: &AgentLayer,
        layout: ObsLayout,
    ) -> Result<Vec<Vec<f32>>, ObsError> {
        (0..agents.n_agents())
            .map(|i| {
                let window = self.extract_agent(grid, agents, i)?;
                Ok(if layout.flatten {
                    window.flatten(layout.include_id)
                } else {
                    window.as_slice().to_vec()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overwatch_core::AgentGroup;
    use overwatch_test_utils::GridBuilder;

    #[test]
    fn rejects_even_or_zero_range() {
        assert!(WindowExtractor::new(4, 10.0).is_err());
        assert!(WindowExtractor::new(0, 10.0).is_err());
        assert!(WindowExtractor::new(3, 0.0).is_err());
        assert!(WindowExtractor::new(3, f32::NAN).is_err());
        assert!(WindowExtractor::new(1, 1.0).is_ok());
        assert!(matches!(
            WindowExtractor::new(u32::MAX, 10.0),
            Err(ObsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn centre_window_on_open_map() {
        let b = GridBuilder::open(5, 5)
            .surveillance((2, 2))
            .sniper((1, 1))
            .target((3, 2));
        let grid = b.grid();
        let agents = b.layer(AgentGroup::Surveillance);
        let mut ex = WindowExtractor::new(3, 10.0).unwrap();
        let w = ex.extract_agent(&grid, &agents, 0).unwrap();

        assert!(w.channel(0).iter().all(|&v| v == 0.0));
        assert_eq!(w.get(1, 0, 0), 0.1);
        assert_eq!(w.get(2, 2, 1), 0.1);
        assert_eq!(w.get(3, 1, 1), 0.1);
        assert_eq!(w.count_nonzero(1), 1);
        assert_eq!(w.identity(), 0.0);

        let flat = ex
            .collect(&grid, &agents, ObsLayout::default())
            .unwrap()
            .remove(0);
        assert_eq!(flat.len(), 4 * 9 + 1);
    }

    #[test]
    fn obstacles_read_positive() {
        let grid = GridBuilder::ascii(&["...", ".#.", "..."]).grid();
        let mut ex = WindowExtractor::new(3, 10.0).unwrap();
        let w = ex.extract(&grid, Position::new(1, 1), 0, 0.0).unwrap();
        assert_eq!(w.get(0, 1, 1), 0.1);
        assert_eq!(w.count_nonzero(0), 1);
    }

    #[test]
    fn boundary_fill_marks_only_off_grid_cells() {
        let grid = GridBuilder::open(5, 5).target((0, 1)).grid();
        let mut ex = WindowExtractor::new(3, 10.0).unwrap();
        let w = ex.extract(&grid, Position::new(0, 0), 0, 0.5).unwrap();
        // Window row 0 and column 0 are off the grid.
        for i in 0..3 {
            assert_eq!(w.get(0, 0, i), 0.1);
            assert_eq!(w.get(0, i, 0), 0.1);
        }
        assert_eq!(w.count_nonzero(0), 5);
        assert_eq!(w.get(2, 1, 2), 0.1);
        assert_eq!(w.count_nonzero(2), 1);
        assert_eq!(w.identity(), 0.5);
    }

    #[test]
    fn reused_buffer_is_fully_rewritten() {
        let grid = GridBuilder::open(6, 6)
            .sniper((0, 0))
            .sniper((5, 5))
            .grid();
        let mut ex = WindowExtractor::new(3, 10.0).unwrap();
        ex.extract(&grid, Position::new(5, 5), 0, 0.25).unwrap();
        let w = ex.extract(&grid, Position::new(0, 0), 0, 0.0).unwrap();
        assert_eq!(w.count_nonzero(1), 1);
        assert_eq!(w.get(1, 1, 1), 0.1);
        assert_eq!(w.count_nonzero(ID_CHANNEL), 0);
        assert_eq!(ex.buffer_count(), 1);
    }

    #[test]
    fn identity_scales_with_group_size() {
        let b = GridBuilder::open(4, 4)
            .surveillance((0, 0))
            .surveillance((1, 1))
            .surveillance((2, 2))
            .surveillance((3, 3));
        let grid = b.grid();
        let agents = b.layer(AgentGroup::Surveillance);
        let mut ex = WindowExtractor::new(3, 10.0).unwrap();
        let ids: Vec<f32> = ex
            .collect(&grid, &agents, ObsLayout::default())
            .unwrap()
            .iter()
            .map(|o| *o.last().unwrap())
            .collect();
        assert_eq!(ids, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn errors_on_bad_agent_or_position() {
        let b = GridBuilder::open(3, 3).surveillance((1, 1));
        let grid = b.grid();
        let agents = b.layer(AgentGroup::Surveillance);
        let mut ex = WindowExtractor::new(3, 10.0).unwrap();
        assert_eq!(
            ex.extract_agent(&grid, &agents, 1).unwrap_err(),
            ObsError::AgentIndexOutOfRange { index: 1, len: 1 }
        );
        assert!(matches!(
            ex.extract(&grid, Position::new(3, 0), 0, 0.0),
            Err(ObsError::PositionOutOfBounds { .. })
        ));
    }
}
