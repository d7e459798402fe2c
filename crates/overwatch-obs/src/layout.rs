//! Observation shape exposed to training code.

use crate::window::{GRID_CHANNELS, WINDOW_CHANNELS};

/// How a [`LocalWindow`](crate::LocalWindow) is handed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObsLayout {
    /// Flatten the four grid channels into one vector.
    pub flatten: bool,
    /// Append the identity scalar when flattening. Ignored otherwise:
    /// unflattened windows always carry the identity channel.
    pub include_id: bool,
}

impl Default for ObsLayout {
    fn default() -> Self {
        Self {
            flatten: true,
            include_id: true,
        }
    }
}

impl ObsLayout {
    /// Observation space for windows of size `obs_range`.
    ///
    /// Flat vectors report `[0, 1]`, which holds while no more than
    /// `layer_normalization` agents share a cell. Windows report
    /// `[0, inf)` since stacked agents have no fixed ceiling.
    pub fn space(&self, obs_range: u32) -> ObsSpace {
        let r = obs_range as usize;
        let (shape, high) = if self.flatten {
            let len = GRID_CHANNELS * r * r + usize::from(self.include_id);
            (ObsShape::Flat { len }, 1.0)
        } else {
            let shape = ObsShape::Window {
                channels: WINDOW_CHANNELS,
                range: r,
            };
            (shape, f32::INFINITY)
        };
        ObsSpace {
            shape,
            low: 0.0,
            high,
        }
    }
}

/// Shape of one agent's observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObsShape {
    /// A 1-D vector.
    Flat {
        /// Vector length.
        len: usize,
    },
    /// A `(channels, range, range)` tensor, channel-major.
    Window {
        /// Channel count.
        channels: usize,
        /// Side length of each channel.
        range: usize,
    },
}

/// A box observation space: shape plus value bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObsSpace {
    /// Observation shape.
    pub shape: ObsShape,
    /// Lower bound of every element.
    pub low: f32,
    /// Upper bound of every element. Nominal for flat vectors: a cell
    /// holding more agents than the normalization divisor exceeds it.
    pub high: f32,
}

impl ObsSpace {
    /// Number of `f32` elements per observation.
    pub fn len(&self) -> usize {
        match self.shape {
            ObsShape::Flat { len } => len,
            ObsShape::Window { channels, range } => channels * range * range,
        }
    }

    /// Whether observations are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tensor dimensions, outermost first.
    pub fn dims(&self) -> Vec<usize> {
        match self.shape {
            ObsShape::Flat { len } => vec![len],
            ObsShape::Window { channels, range } => vec![channels, range, range],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_space_counts_grid_channels_and_id() {
        let space = ObsLayout::default().space(3);
        assert_eq!(space.len(), 37);
        assert_eq!(space.dims(), vec![37]);
        let no_id = ObsLayout {
            flatten: true,
            include_id: false,
        };
        assert_eq!(no_id.space(5).len(), 100);
    }

    #[test]
    fn window_space_has_five_channels() {
        let layout = ObsLayout {
            flatten: false,
            include_id: false,
        };
        let space = layout.space(3);
        assert_eq!(space.dims(), vec![5, 3, 3]);
        assert_eq!(space.len(), 45);
        assert_eq!(space.low, 0.0);
        assert_eq!(space.high, f32::INFINITY);
    }

    #[test]
    fn flat_space_is_unit_box() {
        let space = ObsLayout::default().space(5);
        assert_eq!((space.low, space.high), (0.0, 1.0));
    }
}
