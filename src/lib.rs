//! anchorkit is the post-processing and resampling layer of an embedded
//! anchor-based detector.
//!
//! The [`detection`] module turns raw per-anchor scores, box deltas and
//! landmarks into a score-ranked [`DetectionList`], calibrates it against the
//! source image and removes duplicates with non-maximum suppression. The
//! [`resample`] module resizes 8-bit interleaved or packed RGB565 buffers
//! with bilinear, mean or nearest sampling and a signed fixed-point output
//! shift, one tile at a time if needed. Row-parallel resizing is available
//! with the `rayon` feature.

pub mod detection;
pub mod geometry;
pub mod image;
pub mod pipeline;
pub mod resample;
mod trace;
pub mod util;

pub use detection::{
    calibrate_by_offset, calibrate_landmarks, extract_valid_detections, suppress, AnchorLayout,
    Detection, DetectionList, ExtractParams, HeadTensors,
};
pub use geometry::{rect_to_square, BBox, Landmarks, OverlapMetric};
pub use image::{ImageView, ImageViewMut, OwnedImage, Region};
pub use pipeline::{PostprocessConfig, Postprocessor};
pub use resample::{
    downsample_2x, resize, resize_bilinear_u8, resize_tile, resize_to_owned, InterleavedSource,
    PixelSource, ResizeMode, ResizeParams, Rgb565Source, Sample,
};
#[cfg(feature = "rayon")]
pub use resample::rayon::{resize_par, resize_tile_par};
pub use util::{AnchorKitError, AnchorKitResult};
