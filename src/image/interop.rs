//! Zero-copy bridges to `image` crate buffers.
//!
//! Available when the `image-interop` feature is enabled. No file decoding
//! happens here; callers bring already-decoded buffers.

use crate::image::{ImageView, OwnedImage};
use crate::util::{AnchorKitError, AnchorKitResult};

/// Borrows an interleaved 3-channel view from an `RgbImage`.
pub fn view_from_rgb_image(img: &image::RgbImage) -> AnchorKitResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize, 3)
}

/// Borrows a single-channel view from a `GrayImage`.
pub fn view_from_gray_image(img: &image::GrayImage) -> AnchorKitResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize, 1)
}

/// Moves a 3-channel owned image into an `RgbImage`.
pub fn into_rgb_image(img: OwnedImage<u8>) -> AnchorKitResult<image::RgbImage> {
    if img.channels() != 3 {
        return Err(AnchorKitError::ChannelMismatch {
            src: img.channels(),
            dst: 3,
        });
    }
    let width = img.width();
    let height = img.height();
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(AnchorKitError::InvalidDimensions { width, height }),
    };
    image::RgbImage::from_raw(w, h, img.into_vec())
        .ok_or(AnchorKitError::InvalidDimensions { width, height })
}
