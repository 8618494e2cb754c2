//! Exact 2x box downsampling for interleaved 8-bit images.
//!
//! Each output sample is `(a + b + c + d + 2) / 4` over its 2x2 source
//! block. A trailing odd row or column is dropped.

use crate::image::{ImageView, OwnedImage};
use crate::util::{AnchorKitError, AnchorKitResult};

/// Halves both dimensions of `src`, keeping the first `dst_channels`
/// channels of each pixel (so an RGBA frame can become RGB).
pub fn downsample_2x(src: ImageView<'_, u8>, dst_channels: usize) -> AnchorKitResult<OwnedImage<u8>> {
    let src_channels = src.channels();
    if dst_channels == 0 || dst_channels > src_channels {
        return Err(AnchorKitError::ChannelMismatch {
            src: src_channels,
            dst: dst_channels,
        });
    }
    if src.width() < 2 || src.height() < 2 {
        return Err(AnchorKitError::InvalidDimensions {
            width: src.width(),
            height: src.height(),
        });
    }

    let dst_width = src.width() / 2;
    let dst_height = src.height() / 2;
    let mut dst = vec![0u8; dst_width * dst_height * dst_channels];

    for (y, out_row) in dst.chunks_exact_mut(dst_width * dst_channels).enumerate() {
        let row0 = src.row(2 * y).ok_or(AnchorKitError::BufferTooSmall {
            needed: (2 * y + 1) * src.stride(),
            got: src.as_slice().len(),
        })?;
        let row1 = src.row(2 * y + 1).ok_or(AnchorKitError::BufferTooSmall {
            needed: (2 * y + 2) * src.stride(),
            got: src.as_slice().len(),
        })?;

        for (x, out) in out_row.chunks_exact_mut(dst_channels).enumerate() {
            let left = 2 * x * src_channels;
            let right = left + src_channels;
            for (c, slot) in out.iter_mut().enumerate() {
                let sum = u16::from(row0[left + c])
                    + u16::from(row0[right + c])
                    + u16::from(row1[left + c])
                    + u16::from(row1[right + c]);
                *slot = ((sum + 2) / 4) as u8;
            }
        }
    }

    OwnedImage::new(dst, dst_width, dst_height, dst_channels)
}
