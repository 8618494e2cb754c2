//! Error types for anchorkit.

use thiserror::Error;

/// Result alias for anchorkit operations.
pub type AnchorKitResult<T> = std::result::Result<T, AnchorKitError>;

/// Precondition violations reported by anchorkit.
///
/// Every variant describes a caller bug detected before any work is done.
/// Geometric edge cases (boxes crossing the image border, 1-pixel sources)
/// are clamped locally and never surface here.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnchorKitError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than one row of samples.
    #[error("invalid stride {stride} for row length {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Channel count is zero or above the supported maximum.
    #[error("invalid channel count: {channels}")]
    InvalidChannels { channels: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region does not fit inside its enclosing image or target.
    #[error(
        "region ({x}, {y}) {width}x{height} out of bounds for {img_width}x{img_height}"
    )]
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A threshold is outside `[0, 1]` or not finite.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// A scale factor is not a positive finite number.
    #[error("{name} must be positive and finite, got {value}")]
    InvalidScale { name: &'static str, value: f32 },
    /// A flat tensor does not match the length implied by its layout.
    #[error("{tensor} tensor has {got} values, expected {expected}")]
    TensorLengthMismatch {
        tensor: &'static str,
        expected: usize,
        got: usize,
    },
    /// Destination cannot hold the channels produced by the source.
    #[error("destination has {dst} channels, source produces {src}")]
    ChannelMismatch { src: usize, dst: usize },
    /// Fixed-point shift magnitude would overflow an `i32` sample.
    #[error("shift {shift} out of range")]
    InvalidShift { shift: i32 },
    /// Any other invalid argument.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
