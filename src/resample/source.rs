//! Pixel sources and destination sample types for the resampler.

use crate::image::color::rgb565_to_rgb888;
use crate::image::{ImageView, MAX_CHANNELS};
use crate::util::{AnchorKitError, AnchorKitResult};

/// A readable pixel grid that decodes to interleaved integer channels.
///
/// Implementations fix the pixel format for a whole call, so the kernels
/// are monomorphized per format and never branch on it per pixel.
pub trait PixelSource: Sync {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Channels produced by [`PixelSource::fetch`].
    fn channels(&self) -> usize;
    /// Decodes pixel `(x, y)` into the first `channels()` slots of `out`.
    ///
    /// Callers guarantee `x < width()` and `y < height()`.
    fn fetch(&self, x: usize, y: usize, out: &mut [i32; MAX_CHANNELS]);
}

/// Interleaved 8-bit source with 1 to 4 channels.
#[derive(Clone, Copy)]
pub struct InterleavedSource<'a> {
    view: ImageView<'a, u8>,
}

impl<'a> InterleavedSource<'a> {
    pub fn new(view: ImageView<'a, u8>) -> Self {
        Self { view }
    }
}

impl PixelSource for InterleavedSource<'_> {
    fn width(&self) -> usize {
        self.view.width()
    }

    fn height(&self) -> usize {
        self.view.height()
    }

    fn channels(&self) -> usize {
        self.view.channels()
    }

    #[inline]
    fn fetch(&self, x: usize, y: usize, out: &mut [i32; MAX_CHANNELS]) {
        let channels = self.view.channels();
        let start = y * self.view.stride() + x * channels;
        let px = &self.view.as_slice()[start..start + channels];
        for (slot, &value) in out.iter_mut().zip(px) {
            *slot = i32::from(value);
        }
    }
}

/// Packed, byte-swapped RGB565 source decoding to three 8-bit channels.
#[derive(Clone, Copy)]
pub struct Rgb565Source<'a> {
    view: ImageView<'a, u16>,
}

impl<'a> Rgb565Source<'a> {
    /// Wraps a single-sample-per-pixel `u16` view.
    pub fn new(view: ImageView<'a, u16>) -> AnchorKitResult<Self> {
        if view.channels() != 1 {
            return Err(AnchorKitError::InvalidChannels {
                channels: view.channels(),
            });
        }
        Ok(Self { view })
    }
}

impl PixelSource for Rgb565Source<'_> {
    fn width(&self) -> usize {
        self.view.width()
    }

    fn height(&self) -> usize {
        self.view.height()
    }

    fn channels(&self) -> usize {
        3
    }

    #[inline]
    fn fetch(&self, x: usize, y: usize, out: &mut [i32; MAX_CHANNELS]) {
        let word = self.view.as_slice()[y * self.view.stride() + x];
        let [r, g, b] = rgb565_to_rgb888(word);
        out[0] = i32::from(r);
        out[1] = i32::from(g);
        out[2] = i32::from(b);
    }
}

/// Destination sample type. Values outside the type's range saturate.
pub trait Sample: Copy + Default + Send + Sync {
    fn from_i32(value: i32) -> Self;
}

macro_rules! impl_sample {
    ($($ty:ty),+) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn from_i32(value: i32) -> Self {
                    value.clamp(<$ty>::MIN as i32, <$ty>::MAX as i32) as $ty
                }
            }
        )+
    };
}

impl_sample!(u8, i8, u16, i16);

impl Sample for i32 {
    #[inline]
    fn from_i32(value: i32) -> Self {
        value
    }
}
