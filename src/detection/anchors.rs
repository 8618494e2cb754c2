//! Anchor-grid scanning of raw detector outputs.

use crate::detection::{Detection, DetectionList};
use crate::geometry::{BBox, Landmarks};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{check_scale, check_unit_threshold};
use crate::util::{AnchorKitError, AnchorKitResult};

/// Geometry of one detector head.
///
/// Anchor `a` at feature cell `(row, col)` is the square
/// `[col * stride, row * stride, col * stride + size - 1, row * stride + size - 1]`
/// with `size = anchor_sizes[a]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorLayout {
    pub map_width: usize,
    pub map_height: usize,
    pub stride: usize,
    pub anchor_sizes: Vec<usize>,
}

impl AnchorLayout {
    pub fn new(map_width: usize, map_height: usize, stride: usize, anchor_sizes: Vec<usize>) -> Self {
        Self {
            map_width,
            map_height,
            stride,
            anchor_sizes,
        }
    }

    pub fn anchors_per_cell(&self) -> usize {
        self.anchor_sizes.len()
    }

    /// Total number of anchors on the feature map, or `None` when the
    /// product overflows `usize`.
    pub fn num_anchors(&self) -> Option<usize> {
        self.map_width
            .checked_mul(self.map_height)?
            .checked_mul(self.anchor_sizes.len())
    }

    fn overflow_error(&self) -> AnchorKitError {
        AnchorKitError::InvalidDimensions {
            width: self.map_width,
            height: self.map_height,
        }
    }

    fn validate(&self) -> AnchorKitResult<()> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(AnchorKitError::InvalidDimensions {
                width: self.map_width,
                height: self.map_height,
            });
        }
        if self.stride == 0 {
            return Err(AnchorKitError::InvalidInput("anchor stride must be positive"));
        }
        if self.anchor_sizes.is_empty() {
            return Err(AnchorKitError::InvalidInput("anchor size table is empty"));
        }
        if self.anchor_sizes.contains(&0) {
            return Err(AnchorKitError::InvalidInput("anchor sizes must be positive"));
        }
        Ok(())
    }
}

/// Flat output tensors of one head, row-major over the feature map with
/// anchors innermost.
#[derive(Clone, Copy, Debug)]
pub struct HeadTensors<'a> {
    /// `num_anchors * num_classes` scores.
    pub scores: &'a [f32],
    /// `num_anchors * 4` box deltas `[dx1, dy1, dx2, dy2]`.
    pub offsets: &'a [f32],
    /// `num_anchors * 10` landmark fractions, when the head predicts them.
    pub landmarks: Option<&'a [f32]>,
}

/// Thresholding and scaling applied while scanning anchors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtractParams {
    /// Scores must be strictly greater than this to produce a detection.
    pub score_threshold: f32,
    /// Maps network-input rows back to source-image rows.
    pub height_scale: f32,
    /// Maps network-input columns back to source-image columns.
    pub width_scale: f32,
    /// Apply the predicted deltas to the anchor box during extraction.
    pub apply_regression: bool,
    /// Score channels per anchor.
    pub num_classes: usize,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            score_threshold: 0.5,
            height_scale: 1.0,
            width_scale: 1.0,
            apply_regression: false,
            num_classes: 1,
        }
    }
}

/// Scans every anchor of a head and collects those scoring above threshold.
///
/// For each anchor the highest class score above `score_threshold` decides
/// the category (the lower channel wins ties). Offsets and landmarks are
/// copied unchanged; with `apply_regression` the offsets are also applied to
/// the anchor box, in units of the anchor size. Boxes are finally scaled by
/// `width_scale`/`height_scale`.
///
/// The output follows scan order (row, column, anchor) and may be empty.
pub fn extract_valid_detections(
    tensors: HeadTensors<'_>,
    layout: &AnchorLayout,
    params: ExtractParams,
) -> AnchorKitResult<DetectionList> {
    layout.validate()?;
    check_unit_threshold("score_threshold", params.score_threshold)?;
    check_scale("height_scale", params.height_scale)?;
    check_scale("width_scale", params.width_scale)?;
    if params.num_classes == 0 {
        return Err(AnchorKitError::InvalidInput("num_classes must be positive"));
    }

    let num_anchors = layout.num_anchors().ok_or_else(|| layout.overflow_error())?;
    let expected = |per_anchor: usize| {
        num_anchors
            .checked_mul(per_anchor)
            .ok_or_else(|| layout.overflow_error())
    };
    check_len("scores", tensors.scores.len(), expected(params.num_classes)?)?;
    check_len("offsets", tensors.offsets.len(), expected(4)?)?;
    if let Some(landmarks) = tensors.landmarks {
        check_len("landmarks", landmarks.len(), expected(10)?)?;
    }

    let _span = trace_span!(
        "extract_valid_detections",
        stride = layout.stride,
        anchors = num_anchors
    )
    .entered();

    let anchors_per_cell = layout.anchors_per_cell();
    let stride = layout.stride as f32;
    let mut out = DetectionList::new();

    for (i, scores) in tensors.scores.chunks_exact(params.num_classes).enumerate() {
        let Some((category, score)) = best_class(scores, params.score_threshold) else {
            continue;
        };

        let cell = i / anchors_per_cell;
        let size = layout.anchor_sizes[i % anchors_per_cell] as f32;
        let x1 = (cell % layout.map_width) as f32 * stride;
        let y1 = (cell / layout.map_width) as f32 * stride;
        let mut bbox = BBox::new(x1, y1, x1 + size - 1.0, y1 + size - 1.0);

        let offset = BBox::from_slice(&tensors.offsets[i * 4..i * 4 + 4]);
        if params.apply_regression {
            bbox.x1 += offset.x1 * size;
            bbox.y1 += offset.y1 * size;
            bbox.x2 += offset.x2 * size;
            bbox.y2 += offset.y2 * size;
        }
        bbox.x1 *= params.width_scale;
        bbox.x2 *= params.width_scale;
        bbox.y1 *= params.height_scale;
        bbox.y2 *= params.height_scale;

        let landmarks = tensors
            .landmarks
            .map(|lm| Landmarks::from_slice(&lm[i * 10..i * 10 + 10]))
            .unwrap_or_default();

        out.push(Detection {
            category,
            score,
            bbox,
            offset,
            landmarks,
        });
    }

    trace_event!("valid_detections", count = out.len());
    Ok(out)
}

fn best_class(scores: &[f32], threshold: f32) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (category, &score) in scores.iter().enumerate() {
        if score > threshold && best.map_or(true, |(_, s)| score > s) {
            best = Some((category, score));
        }
    }
    best
}

fn check_len(tensor: &'static str, got: usize, expected: usize) -> AnchorKitResult<()> {
    if got != expected {
        return Err(AnchorKitError::TensorLengthMismatch {
            tensor,
            expected,
            got,
        });
    }
    Ok(())
}
