//! Row-parallel resize driver (feature-gated).
//!
//! Splits one logical resize into destination rows and hands each row to
//! the same scalar kernel used by [`resize_tile`](crate::resample::resize_tile).
//! Rows are disjoint mutable slices, so no synchronization is needed and
//! the output is bit-identical to the sequential path.

use crate::image::{ImageViewMut, Region};
use crate::resample::scalar::RowKernel;
use crate::resample::source::{PixelSource, Sample};
use crate::resample::{ResizeParams, ResizePlan};
use crate::trace::trace_span;
use crate::util::AnchorKitResult;
use rayon::prelude::*;

/// Parallel counterpart of [`resize`](crate::resample::resize).
pub fn resize_par<S: PixelSource, T: Sample>(
    src: &S,
    dst: &mut ImageViewMut<'_, T>,
    target: Region,
    params: ResizeParams,
) -> AnchorKitResult<()> {
    let tile = Region::full(target.width, target.height);
    resize_tile_par(src, dst, target, tile, params)
}

/// Parallel counterpart of [`resize_tile`](crate::resample::resize_tile).
pub fn resize_tile_par<S: PixelSource, T: Sample>(
    src: &S,
    dst: &mut ImageViewMut<'_, T>,
    target: Region,
    tile: Region,
    params: ResizeParams,
) -> AnchorKitResult<()> {
    let plan = ResizePlan::new(src, dst, target, tile, params)?;
    let _span = trace_span!(
        "resize",
        mode = ?params.mode,
        tile_width = tile.width,
        tile_height = tile.height,
        parallel = true
    )
    .entered();

    let kernel = RowKernel::new(params.mode, &plan);
    let stride = dst.stride();
    let first_row = target.y + tile.y;

    dst.raw_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(first_row)
        .take(tile.height)
        .for_each(|(y, row)| kernel.run(src, &plan, y - target.y, row));

    Ok(())
}
