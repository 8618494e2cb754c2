//! Scalar row kernels for the three interpolation modes.
//!
//! Column taps are computed once per call; each row then only resolves its
//! own vertical tap. Every source index is clamped before use, so no
//! destination size can cause an out-of-bounds read.

use crate::image::MAX_CHANNELS;
use crate::resample::source::{PixelSource, Sample};
use crate::resample::{ResizeMode, ResizePlan};
use crate::util::math::{apply_shift, clamp_index};

/// Bilinear tap: two source indices and the weight of the second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LinearTap {
    pub(crate) lo: usize,
    pub(crate) hi: usize,
    pub(crate) frac: f32,
}

/// Maps destination index `i` to a bilinear tap with half-pixel centers.
///
/// Positions before the first or past the last source sample collapse onto
/// the edge sample with zero fractional weight. The upper edge therefore
/// reads `len - 1`, not `len - 2`: a same-size resize of `[0, 100, 200]`
/// keeps `200`, where a base clamped to `len - 2` would give `100`. The
/// mean kernel follows the same edge-replication rule and applies it to
/// every channel alike.
pub(crate) fn linear_tap(i: usize, scale: f32, len: usize) -> LinearTap {
    let pos = (i as f32 + 0.5) * scale - 0.5;
    let base = pos.floor();
    if base < 0.0 {
        return LinearTap {
            lo: 0,
            hi: 0,
            frac: 0.0,
        };
    }
    let lo = base as usize;
    if lo + 1 >= len {
        return LinearTap {
            lo: len - 1,
            hi: len - 1,
            frac: 0.0,
        };
    }
    LinearTap {
        lo,
        hi: lo + 1,
        frac: pos - base,
    }
}

/// Maps destination index `i` to the nearest source index, rounding half to
/// even.
pub(crate) fn nearest_index(i: usize, scale: f32, len: usize) -> usize {
    let pos = (i as f32 * scale).round_ties_even();
    clamp_index(pos as isize, len)
}

/// Mode-specific kernel with its column taps, built once per call.
pub(crate) enum RowKernel {
    Bilinear(Vec<LinearTap>),
    Mean(Vec<usize>),
    Nearest(Vec<usize>),
}

impl RowKernel {
    pub(crate) fn new(mode: ResizeMode, plan: &ResizePlan) -> Self {
        let cols = plan.tile.x..plan.tile.x + plan.tile.width;
        match mode {
            ResizeMode::Bilinear => Self::Bilinear(
                cols.map(|i| linear_tap(i, plan.scale_x, plan.src_width))
                    .collect(),
            ),
            ResizeMode::Mean => Self::Mean(
                cols.map(|i| nearest_index(i, plan.scale_x, plan.src_width))
                    .collect(),
            ),
            ResizeMode::Nearest => Self::Nearest(
                cols.map(|i| nearest_index(i, plan.scale_x, plan.src_width))
                    .collect(),
            ),
        }
    }

    /// Fills target-relative row `ty` of the tile into the destination row.
    pub(crate) fn run<S: PixelSource, T: Sample>(
        &self,
        src: &S,
        plan: &ResizePlan,
        ty: usize,
        row: &mut [T],
    ) {
        match self {
            Self::Bilinear(taps) => bilinear_row(src, plan, taps, ty, row),
            Self::Mean(cols) => mean_row(src, plan, cols, ty, row),
            Self::Nearest(cols) => nearest_row(src, plan, cols, ty, row),
        }
    }
}

#[inline]
fn first_sample(plan: &ResizePlan) -> usize {
    (plan.target.x + plan.tile.x) * plan.channels
}

fn bilinear_row<S: PixelSource, T: Sample>(
    src: &S,
    plan: &ResizePlan,
    taps: &[LinearTap],
    ty: usize,
    row: &mut [T],
) {
    let ch = plan.channels;
    let yt = linear_tap(ty, plan.scale_y, plan.src_height);
    let (wy0, wy1) = (1.0 - yt.frac, yt.frac);

    let mut p00 = [0i32; MAX_CHANNELS];
    let mut p10 = [0i32; MAX_CHANNELS];
    let mut p01 = [0i32; MAX_CHANNELS];
    let mut p11 = [0i32; MAX_CHANNELS];

    let start = first_sample(plan);
    let out = &mut row[start..start + taps.len() * ch];
    for (px, xt) in out.chunks_exact_mut(ch).zip(taps) {
        src.fetch(xt.lo, yt.lo, &mut p00);
        src.fetch(xt.hi, yt.lo, &mut p10);
        src.fetch(xt.lo, yt.hi, &mut p01);
        src.fetch(xt.hi, yt.hi, &mut p11);

        let (wx0, wx1) = (1.0 - xt.frac, xt.frac);
        let w00 = wx0 * wy0;
        let w10 = wx1 * wy0;
        let w01 = wx0 * wy1;
        let w11 = wx1 * wy1;
        for (c, slot) in px.iter_mut().enumerate() {
            let value = p00[c] as f32 * w00
                + p10[c] as f32 * w10
                + p01[c] as f32 * w01
                + p11[c] as f32 * w11;
            *slot = T::from_i32(apply_shift(value.round() as i32, plan.shift));
        }
    }
}

fn mean_row<S: PixelSource, T: Sample>(
    src: &S,
    plan: &ResizePlan,
    cols: &[usize],
    ty: usize,
    row: &mut [T],
) {
    let ch = plan.channels;
    let y0 = nearest_index(ty, plan.scale_y, plan.src_height);
    let y1 = (y0 + 1).min(plan.src_height - 1);

    let mut tmp = [0i32; MAX_CHANNELS];

    let start = first_sample(plan);
    let out = &mut row[start..start + cols.len() * ch];
    for (px, &x0) in out.chunks_exact_mut(ch).zip(cols) {
        let x1 = (x0 + 1).min(plan.src_width - 1);
        let mut acc = [0i32; MAX_CHANNELS];
        for (x, y) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1)] {
            src.fetch(x, y, &mut tmp);
            for (sum, &value) in acc.iter_mut().zip(&tmp).take(ch) {
                *sum += value;
            }
        }
        for (slot, &sum) in px.iter_mut().zip(&acc) {
            *slot = T::from_i32(apply_shift(sum, plan.shift));
        }
    }
}

fn nearest_row<S: PixelSource, T: Sample>(
    src: &S,
    plan: &ResizePlan,
    cols: &[usize],
    ty: usize,
    row: &mut [T],
) {
    let ch = plan.channels;
    let y = nearest_index(ty, plan.scale_y, plan.src_height);
    let mut tmp = [0i32; MAX_CHANNELS];

    let start = first_sample(plan);
    let out = &mut row[start..start + cols.len() * ch];
    for (px, &x) in out.chunks_exact_mut(ch).zip(cols) {
        src.fetch(x, y, &mut tmp);
        for (slot, &value) in px.iter_mut().zip(&tmp) {
            *slot = T::from_i32(apply_shift(value, plan.shift));
        }
    }
}
