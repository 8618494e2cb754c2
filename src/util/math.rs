//! Numeric helpers shared by the detection and resampling code.

use crate::util::{AnchorKitError, AnchorKitResult};

/// Applies a signed fixed-point shift: positive shifts left, negative
/// shifts right (arithmetic).
#[inline]
pub(crate) fn apply_shift(value: i32, shift: i32) -> i32 {
    if shift > 0 {
        value << shift
    } else {
        value >> -shift
    }
}

/// Clamps a possibly negative source index into `[0, len - 1]`.
#[inline]
pub(crate) fn clamp_index(index: isize, len: usize) -> usize {
    if index <= 0 {
        0
    } else {
        (index as usize).min(len - 1)
    }
}

/// Checks that a threshold lies within `[0, 1]`.
pub(crate) fn check_unit_threshold(name: &'static str, value: f32) -> AnchorKitResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(AnchorKitError::InvalidThreshold { name, value });
    }
    Ok(())
}

/// Checks that a scale factor is positive and finite.
pub(crate) fn check_scale(name: &'static str, value: f32) -> AnchorKitResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AnchorKitError::InvalidScale { name, value });
    }
    Ok(())
}
