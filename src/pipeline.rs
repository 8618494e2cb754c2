//! Multi-head post-processing: extract, rank, calibrate and suppress.
//!
//! Detectors with several strides emit one tensor set per head. The
//! [`Postprocessor`] scans each head, merges every batch into one
//! score-ranked list and runs the calibration and NMS stages in order.

use crate::detection::{
    calibrate_by_offset, calibrate_landmarks, extract_valid_detections, suppress, AnchorLayout,
    DetectionList, ExtractParams, HeadTensors,
};
use crate::geometry::{rect_to_square, OverlapMetric};
use crate::trace::{trace_event, trace_span};
use crate::util::math::check_unit_threshold;
use crate::util::{AnchorKitError, AnchorKitResult};

/// Settings for a full post-processing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostprocessConfig {
    pub score_threshold: f32,
    pub nms_threshold: f32,
    pub overlap: OverlapMetric,
    pub num_classes: usize,
    /// Apply offsets to anchors while scanning.
    pub apply_regression: bool,
    /// Apply offsets after ranking, with image-border clamping. Leave this
    /// off when `apply_regression` is set or the deltas apply twice.
    pub calibrate_offsets: bool,
    /// Convert landmarks to image coordinates.
    pub calibrate_landmarks: bool,
    /// Expand surviving boxes to squares (e.g. before cropping for a
    /// second-stage network).
    pub square_output: bool,
    pub height_scale: f32,
    pub width_scale: f32,
    /// Source image size used for clamping.
    pub image_width: usize,
    pub image_height: usize,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.5,
            nms_threshold: 0.3,
            overlap: OverlapMetric::Iou,
            num_classes: 1,
            apply_regression: false,
            calibrate_offsets: true,
            calibrate_landmarks: true,
            square_output: false,
            height_scale: 1.0,
            width_scale: 1.0,
            image_width: 320,
            image_height: 240,
        }
    }
}

impl PostprocessConfig {
    fn extract_params(&self) -> ExtractParams {
        ExtractParams {
            score_threshold: self.score_threshold,
            height_scale: self.height_scale,
            width_scale: self.width_scale,
            apply_regression: self.apply_regression,
            num_classes: self.num_classes,
        }
    }
}

/// Post-processor for a fixed set of detector heads.
#[derive(Clone, Debug)]
pub struct Postprocessor {
    heads: Vec<AnchorLayout>,
    cfg: PostprocessConfig,
}

impl Postprocessor {
    pub fn new(heads: Vec<AnchorLayout>) -> Self {
        Self {
            heads,
            cfg: PostprocessConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: PostprocessConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &PostprocessConfig {
        &self.cfg
    }

    pub fn heads(&self) -> &[AnchorLayout] {
        &self.heads
    }

    /// Runs every stage over one frame's outputs, `outputs[i]` belonging to
    /// `heads()[i]`. Returns the surviving detections in descending score
    /// order.
    pub fn run(&self, outputs: &[HeadTensors<'_>]) -> AnchorKitResult<DetectionList> {
        if outputs.len() != self.heads.len() {
            return Err(AnchorKitError::InvalidInput(
                "one tensor set is required per detector head",
            ));
        }
        check_unit_threshold("nms_threshold", self.cfg.nms_threshold)?;
        if self.cfg.image_width == 0 || self.cfg.image_height == 0 {
            return Err(AnchorKitError::InvalidDimensions {
                width: self.cfg.image_width,
                height: self.cfg.image_height,
            });
        }

        let _span = trace_span!("postprocess", heads = self.heads.len()).entered();

        let params = self.cfg.extract_params();
        let mut ranked = DetectionList::new();
        for (i, (layout, tensors)) in self.heads.iter().zip(outputs).enumerate() {
            let batch = extract_valid_detections(*tensors, layout, params)?;
            if i == 0 {
                // First batch: a stable sort gives the same order as merging
                // into an empty list.
                ranked = batch;
                ranked.sort_by_score();
            } else {
                ranked.merge_sorted(batch);
            }
        }
        trace_event!("ranked_candidates", count = ranked.len());

        if self.cfg.calibrate_offsets {
            calibrate_by_offset(&mut ranked, self.cfg.image_height, self.cfg.image_width);
        }
        suppress(&mut ranked, self.cfg.nms_threshold, self.cfg.overlap)?;
        if self.cfg.calibrate_landmarks {
            calibrate_landmarks(&mut ranked);
        }
        if self.cfg.square_output {
            let mut boxes = ranked.boxes();
            rect_to_square(&mut boxes, self.cfg.image_width, self.cfg.image_height);
            for (det, bbox) in ranked.items_mut().iter_mut().zip(boxes) {
                det.bbox = bbox;
            }
        }

        Ok(ranked)
    }
}
