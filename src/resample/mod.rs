//! Fixed-point image resampling.
//!
//! A resize maps the whole source onto a `target` rectangle of the
//! destination. Scale factors are `src / target` per axis and all sample
//! positions are measured from the target origin, so computing any `tile`
//! of the target yields exactly the pixels a full-target call would. This is
//! what lets a scheduler split one resize into disjoint tiles.
//!
//! Every computed value passes through a signed fixed-point `shift` before
//! it is stored: positive values shift left, negative values shift right.
//! With `shift = 0` and `u8` output the engine is a plain resizer; with a
//! positive shift and `i16` output it produces pre-scaled inference input.

use crate::image::{ImageView, ImageViewMut, OwnedImage, Region, MAX_CHANNELS};
use crate::trace::{trace_event, trace_span};
use crate::util::{AnchorKitError, AnchorKitResult};

mod downsample;
#[cfg(feature = "rayon")]
pub mod rayon;
pub(crate) mod scalar;
mod source;

pub use downsample::downsample_2x;
pub use source::{InterleavedSource, PixelSource, Rgb565Source, Sample};

use scalar::RowKernel;

/// Largest accepted shift magnitude; keeps a four-sample mean of 8-bit
/// values inside `i32`.
pub const MAX_SHIFT: i32 = 16;

/// Interpolation policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizeMode {
    /// Four-tap bilinear with edge replication.
    #[default]
    Bilinear,
    /// Sum of the 2x2 block at the nearest sample, divided by four through
    /// the shift. Meant for downscaling by about 2x.
    Mean,
    /// Single nearest sample.
    Nearest,
}

/// Per-call resampling settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResizeParams {
    pub mode: ResizeMode,
    /// Signed fixed-point shift applied to every output value.
    pub shift: i32,
}

impl ResizeParams {
    pub fn new(mode: ResizeMode, shift: i32) -> Self {
        Self { mode, shift }
    }
}

/// Validated geometry shared by the row kernels of one call.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ResizePlan {
    pub(crate) src_width: usize,
    pub(crate) src_height: usize,
    pub(crate) channels: usize,
    pub(crate) scale_x: f32,
    pub(crate) scale_y: f32,
    pub(crate) shift: i32,
    pub(crate) target: Region,
    pub(crate) tile: Region,
}

impl ResizePlan {
    pub(crate) fn new<S: PixelSource, T>(
        src: &S,
        dst: &ImageViewMut<'_, T>,
        target: Region,
        tile: Region,
        params: ResizeParams,
    ) -> AnchorKitResult<Self> {
        target.check_within(dst.width(), dst.height())?;
        tile.check_within(target.width, target.height)?;
        if src.width() == 0 || src.height() == 0 {
            return Err(AnchorKitError::InvalidDimensions {
                width: src.width(),
                height: src.height(),
            });
        }
        let channels = src.channels();
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(AnchorKitError::InvalidChannels { channels });
        }
        if dst.channels() != channels {
            return Err(AnchorKitError::ChannelMismatch {
                src: channels,
                dst: dst.channels(),
            });
        }
        if params.shift.abs() > MAX_SHIFT {
            return Err(AnchorKitError::InvalidShift {
                shift: params.shift,
            });
        }

        let shift = match params.mode {
            ResizeMode::Mean => params.shift - 2,
            ResizeMode::Bilinear | ResizeMode::Nearest => params.shift,
        };
        Ok(Self {
            src_width: src.width(),
            src_height: src.height(),
            channels,
            scale_x: src.width() as f32 / target.width as f32,
            scale_y: src.height() as f32 / target.height as f32,
            shift,
            target,
            tile,
        })
    }

    /// Target-relative row indices covered by the tile.
    pub(crate) fn rows(&self) -> std::ops::Range<usize> {
        self.tile.y..self.tile.y + self.tile.height
    }
}

/// Resizes `src` onto the whole `target` rectangle of `dst`.
pub fn resize<S: PixelSource, T: Sample>(
    src: &S,
    dst: &mut ImageViewMut<'_, T>,
    target: Region,
    params: ResizeParams,
) -> AnchorKitResult<()> {
    let tile = Region::full(target.width, target.height);
    resize_tile(src, dst, target, tile, params)
}

/// Computes only the pixels of `tile` (relative to the target origin) of
/// the resize of `src` onto `target`.
///
/// Pixels of `dst` outside the tile are left untouched. Tiles of one target
/// may be computed in any order or concurrently on disjoint destination
/// rows.
pub fn resize_tile<S: PixelSource, T: Sample>(
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
        src_width = plan.src_width,
        src_height = plan.src_height,
        tile_width = tile.width,
        tile_height = tile.height
    )
    .entered();

    let kernel = RowKernel::new(params.mode, &plan);
    for ty in plan.rows() {
        let y = target.y + ty;
        let row = dst.row_mut(y).ok_or(AnchorKitError::RegionOutOfBounds {
            x: target.x,
            y,
            width: target.width,
            height: 1,
            img_width: target.x + target.width,
            img_height: target.y + target.height,
        })?;
        kernel.run(src, &plan, ty, row);
    }

    trace_event!("resize_done", pixels = tile.width * tile.height);
    Ok(())
}

/// Resizes `src` into a newly allocated `width x height` image.
pub fn resize_to_owned<S: PixelSource, T: Sample>(
    src: &S,
    width: usize,
    height: usize,
    params: ResizeParams,
) -> AnchorKitResult<OwnedImage<T>> {
    let mut out = OwnedImage::zeros(width, height, src.channels())?;
    resize(src, &mut out.view_mut(), Region::full(width, height), params)?;
    Ok(out)
}

/// Convenience wrapper for the common 8-bit bilinear resize.
pub fn resize_bilinear_u8(
    src: ImageView<'_, u8>,
    width: usize,
    height: usize,
) -> AnchorKitResult<OwnedImage<u8>> {
    let src = InterleavedSource::new(src);
    resize_to_owned(&src, width, height, ResizeParams::default())
}
