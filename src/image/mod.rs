//! Image views and owned pixel buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer of samples. A pixel is
//! `channels` consecutive samples; the stride counts samples between the
//! starts of consecutive rows, so a stride larger than `width * channels`
//! represents padded rows. Region views are zero-copy and retain the
//! original stride. Packed formats such as RGB565 use one `u16` sample per
//! pixel (`channels == 1`).

use crate::util::{AnchorKitError, AnchorKitResult};

pub mod color;
#[cfg(feature = "image-interop")]
pub mod interop;

/// Largest channel count carried by interleaved buffers.
pub const MAX_CHANNELS: usize = 4;

/// Axis-aligned pixel rectangle `[x, x + width) x [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    /// Creates a region from its origin and size.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole `width x height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns `true` when the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Checks that the region is non-empty and lies within `width x height`.
    pub fn check_within(&self, width: usize, height: usize) -> AnchorKitResult<()> {
        let err = AnchorKitError::RegionOutOfBounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            img_width: width,
            img_height: height,
        };
        if self.is_empty() {
            return Err(err);
        }
        let end_x = self.x.checked_add(self.width).ok_or(err.clone())?;
        let end_y = self.y.checked_add(self.height).ok_or(err.clone())?;
        if end_x > width || end_y > height {
            return Err(err);
        }
        Ok(())
    }
}

/// Borrowed 2D image view with interleaved channels and an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width * channels`.
    pub fn from_slice(
        data: &'a [T],
        width: usize,
        height: usize,
        channels: usize,
    ) -> AnchorKitResult<Self> {
        let stride = width.saturating_mul(channels);
        Self::new(data, width, height, channels, stride)
    }

    /// Creates a view with an explicit stride in samples.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> AnchorKitResult<Self> {
        let needed = required_len(width, height, channels, stride)?;
        if data.len() < needed {
            return Err(AnchorKitError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of samples per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the stride in samples between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the samples of row `y` (`width * channels` long).
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * self.channels)?;
        self.data.get(start..end)
    }

    /// Returns the samples of the pixel at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [T]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let start = x * self.channels;
        row.get(start..start + self.channels)
    }

    /// Returns a zero-copy view of `region` sharing this view's stride.
    pub fn region(&self, region: Region) -> AnchorKitResult<ImageView<'a, T>> {
        region.check_within(self.width, self.height)?;
        let start = region.y * self.stride + region.x * self.channels;
        let data = self
            .data
            .get(start..)
            .ok_or(AnchorKitError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;
        ImageView::new(
            data,
            region.width,
            region.height,
            self.channels,
            self.stride,
        )
    }
}

/// Mutable counterpart of [`ImageView`], used as a resampling destination.
pub struct ImageViewMut<'a, T> {
    data: &'a mut [T],
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
}

impl<'a, T> ImageViewMut<'a, T> {
    /// Creates a contiguous mutable view with `stride == width * channels`.
    pub fn from_slice(
        data: &'a mut [T],
        width: usize,
        height: usize,
        channels: usize,
    ) -> AnchorKitResult<Self> {
        let stride = width.saturating_mul(channels);
        Self::new(data, width, height, channels, stride)
    }

    /// Creates a mutable view with an explicit stride in samples.
    pub fn new(
        data: &'a mut [T],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> AnchorKitResult<Self> {
        let needed = required_len(width, height, channels, stride)?;
        if data.len() < needed {
            return Err(AnchorKitError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Reborrows as a shared view.
    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &*self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.stride,
        }
    }

    /// Returns the samples of row `y` for writing.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        let end = start + self.width * self.channels;
        self.data.get_mut(start..end)
    }

    /// Gives the rows backing storage to row-parallel drivers.
    #[cfg(feature = "rayon")]
    pub(crate) fn raw_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

/// Owned contiguous image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
    channels: usize,
}

impl<T> OwnedImage<T> {
    /// Wraps a contiguous buffer of exactly `width * height * channels` samples.
    pub fn new(data: Vec<T>, width: usize, height: usize, channels: usize) -> AnchorKitResult<Self> {
        let needed = required_len(width, height, channels, width.saturating_mul(channels))?;
        if data.len() < needed {
            return Err(AnchorKitError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(AnchorKitError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of samples per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the contiguous sample buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the image and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.width * self.channels,
        }
    }

    /// Returns a mutable view of the image.
    pub fn view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.width * self.channels,
        }
    }
}

impl<T: Copy + Default> OwnedImage<T> {
    /// Allocates a zero-filled image.
    pub fn zeros(width: usize, height: usize, channels: usize) -> AnchorKitResult<Self> {
        let len = required_len(width, height, channels, width.saturating_mul(channels))?;
        Self::new(vec![T::default(); len], width, height, channels)
    }
}

fn required_len(
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
) -> AnchorKitResult<usize> {
    if width == 0 || height == 0 {
        return Err(AnchorKitError::InvalidDimensions { width, height });
    }
    if channels == 0 || channels > MAX_CHANNELS {
        return Err(AnchorKitError::InvalidChannels { channels });
    }
    let row_len = width
        .checked_mul(channels)
        .ok_or(AnchorKitError::InvalidDimensions { width, height })?;
    if stride < row_len {
        return Err(AnchorKitError::InvalidStride {
            width: row_len,
            stride,
        });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(AnchorKitError::InvalidDimensions { width, height })?;
    Ok(needed)
}
