//! RGB565 <-> RGB888 pixel codecs.
//!
//! Packed pixels are 16-bit words with red in bits 15..11, green in 10..5 and
//! blue in 4..0, stored byte-swapped relative to memory order (the layout
//! produced by most SPI/parallel camera sensors and LCD controllers).
//! Widening shifts each field left and refills the vacated low bits with the
//! field's high bits; narrowing truncates.

use crate::image::{ImageView, ImageViewMut};
use crate::util::{AnchorKitError, AnchorKitResult};

const RED_MASK: u16 = 0xF800;
const GREEN_MASK: u16 = 0x07E0;
const BLUE_MASK: u16 = 0x001F;

/// Decodes one byte-swapped RGB565 word into `[r, g, b]`.
#[inline]
pub fn rgb565_to_rgb888(word: u16) -> [u8; 3] {
    let word = word.swap_bytes();
    let r = ((word & RED_MASK) >> 11) as u8;
    let g = ((word & GREEN_MASK) >> 5) as u8;
    let b = (word & BLUE_MASK) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// Encodes `[r, g, b]` into one byte-swapped RGB565 word.
#[inline]
pub fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let packed = (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3);
    packed.swap_bytes()
}

/// Converts a packed RGB565 image into an interleaved 3-channel image.
pub fn convert_rgb565_to_rgb888(
    src: ImageView<'_, u16>,
    dst: &mut ImageViewMut<'_, u8>,
) -> AnchorKitResult<()> {
    check_same_size(src.width(), src.height(), dst.width(), dst.height())?;
    if src.channels() != 1 {
        return Err(AnchorKitError::InvalidChannels {
            channels: src.channels(),
        });
    }
    if dst.channels() != 3 {
        return Err(AnchorKitError::ChannelMismatch {
            src: 3,
            dst: dst.channels(),
        });
    }

    for y in 0..src.height() {
        let (Some(src_row), Some(dst_row)) = (src.row(y), dst.row_mut(y)) else {
            continue;
        };
        for (word, out) in src_row.iter().zip(dst_row.chunks_exact_mut(3)) {
            out.copy_from_slice(&rgb565_to_rgb888(*word));
        }
    }
    Ok(())
}

/// Converts an interleaved RGB image (3 or 4 channels) into packed RGB565.
///
/// A fourth channel, if present, is ignored.
pub fn convert_rgb888_to_rgb565(
    src: ImageView<'_, u8>,
    dst: &mut ImageViewMut<'_, u16>,
) -> AnchorKitResult<()> {
    check_same_size(src.width(), src.height(), dst.width(), dst.height())?;
    let channels = src.channels();
    if channels < 3 {
        return Err(AnchorKitError::InvalidChannels { channels });
    }
    if dst.channels() != 1 {
        return Err(AnchorKitError::ChannelMismatch {
            src: 1,
            dst: dst.channels(),
        });
    }

    for y in 0..src.height() {
        let (Some(src_row), Some(dst_row)) = (src.row(y), dst.row_mut(y)) else {
            continue;
        };
        for (px, out) in src_row.chunks_exact(channels).zip(dst_row.iter_mut()) {
            *out = rgb888_to_rgb565(px[0], px[1], px[2]);
        }
    }
    Ok(())
}

fn check_same_size(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) -> AnchorKitResult<()> {
    if src_width != dst_width || src_height != dst_height {
        return Err(AnchorKitError::RegionOutOfBounds {
            x: 0,
            y: 0,
            width: src_width,
            height: src_height,
            img_width: dst_width,
            img_height: dst_height,
        });
    }
    Ok(())
}
