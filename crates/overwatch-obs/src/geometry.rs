//! Window clipping against the grid boundary.
//!
//! A window of odd size `r = 2 * offset + 1` centred on `(x, y)` wants
//! the grid cells `[x - offset, x + offset] × [y - offset, y + offset]`.
//! Near an edge part of that span is off the grid. [`WindowClip`] holds
//! the in-bounds source span and the window span it lands in, computed
//! independently per axis so the window keeps its full size and the
//! agent stays at its centre.

use overwatch_core::Position;
use overwatch_space::GridDims;
use std::ops::Range;

/// Matching source (grid) and destination (window) spans.
///
/// All ranges are half-open. `src_x.len() == dst_x.len()` and likewise
/// for `y`.
///
/// # Examples
///
/// ```
/// use overwatch_obs::WindowClip;
/// use overwatch_space::GridDims;
/// use overwatch_core::Position;
///
/// let dims = GridDims::new(5, 5).unwrap();
/// // Corner agent with a 3×3 window: only the lower-right 2×2 of the
/// // window overlaps the grid.
/// let clip = WindowClip::new(Position::new(0, 0), 3, dims);
/// assert_eq!(clip.src_x, 0..2);
/// assert_eq!(clip.dst_x, 1..3);
/// assert_eq!(clip.fill_count(3), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowClip {
    /// Grid rows along `x` copied into the window.
    pub src_x: Range<usize>,
    /// Grid columns along `y` copied into the window.
    pub src_y: Range<usize>,
    /// Window rows receiving `src_x`.
    pub dst_x: Range<usize>,
    /// Window columns receiving `src_y`.
    pub dst_y: Range<usize>,
}

impl WindowClip {
    /// Clip a window of size `obs_range` centred on `center`.
    ///
    /// `center` must lie on the grid and `obs_range` must be odd;
    /// otherwise the ranges are still well formed but the agent is not
    /// at the window's centre.
    pub fn new(center: Position, obs_range: u32, dims: GridDims) -> Self {
        let offset = obs_offset(obs_range);
        let (src_x, dst_x) = clip_axis(center.x, offset, dims.xs() as i32);
        let (src_y, dst_y) = clip_axis(center.y, offset, dims.ys() as i32);
        Self {
            src_x,
            src_y,
            dst_x,
            dst_y,
        }
    }

    /// Number of window cells backed by grid cells.
    pub fn overlap(&self) -> usize {
        self.src_x.len() * self.src_y.len()
    }

    /// Number of window cells that fall off the grid.
    pub fn fill_count(&self, obs_range: u32) -> usize {
        let r = obs_range as usize;
        r.saturating_mul(r) - self.overlap()
    }
}

/// Half-width of a window of size `obs_range`.
pub(crate) fn obs_offset(obs_range: u32) -> i32 {
    (obs_range.saturating_sub(1) / 2) as i32
}

fn clip_axis(c: i32, offset: i32, extent: i32) -> (Range<usize>, Range<usize>) {
    let lo = c.saturating_sub(offset).clamp(0, extent - 1);
    let hi = c.saturating_add(offset).clamp(0, extent - 1);
    let dst_lo = c.saturating_sub(offset).clamp(-offset, 0).abs();
    let dst_hi = dst_lo + (hi - lo);
    (
        lo as usize..hi as usize + 1,
        dst_lo as usize..dst_hi as usize + 1,
    )
}

/// Whether a window of size `obs_range` centred on `center` lies
/// entirely on the grid.
pub fn is_interior(center: Position, obs_range: u32, dims: GridDims) -> bool {
    let offset = obs_offset(obs_range);
    center.x.checked_sub(offset).is_some_and(|lo| lo >= 0)
        && center.y.checked_sub(offset).is_some_and(|lo| lo >= 0)
        && center.x.checked_add(offset).is_some_and(|hi| hi < dims.xs() as i32)
        && center.y.checked_add(offset).is_some_and(|hi| hi < dims.ys() as i32)
}
