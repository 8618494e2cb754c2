//! Detection candidates, score ordering, calibration and suppression.
//!
//! A [`DetectionList`] is a contiguous vector. Suppression marks discarded
//! entries in a tombstone vector and compacts once at the end, so no entry is
//! ever unlinked while the list is being walked.

use crate::geometry::{BBox, Landmarks};

mod anchors;
mod calibrate;
mod nms;

pub use anchors::{extract_valid_detections, AnchorLayout, ExtractParams, HeadTensors};
pub use calibrate::{calibrate_by_offset, calibrate_landmarks};
pub use nms::suppress;

/// One candidate produced from an anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Index of the score channel that passed the threshold.
    pub category: usize,
    pub score: f32,
    /// Box in image coordinates.
    pub bbox: BBox,
    /// Raw regression deltas, in units of the box size.
    pub offset: BBox,
    pub landmarks: Landmarks,
}

/// Ordered collection of detections.
///
/// Lists built by [`extract_valid_detections`] follow anchor scan order.
/// Lists built through [`DetectionList::merge_sorted`] are in non-increasing
/// score order with ties kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionList {
    items: Vec<Detection>,
}

impl DetectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Appends without any ordering.
    pub fn push(&mut self, detection: Detection) {
        self.items.push(detection);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Detection] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Detection> {
        self.items
    }

    /// Returns all boxes in list order.
    pub fn boxes(&self) -> Vec<BBox> {
        self.items.iter().map(|d| d.bbox).collect()
    }

    /// Inserts every entry of `unsorted`, in its order, after all existing
    /// entries whose score is greater than or equal to it.
    ///
    /// `self` must already be in non-increasing score order (an empty list
    /// is). Each insertion searches the sorted prefix, so merging `m` entries
    /// into `n` costs `O(m * (log n + n))` moves at worst; per-frame candidate
    /// counts are small.
    pub fn merge_sorted(&mut self, unsorted: DetectionList) {
        self.items.reserve(unsorted.len());
        for det in unsorted.items {
            let pos = self.items.partition_point(|d| d.score >= det.score);
            self.items.insert(pos, det);
        }
    }

    /// Stable sort by descending score.
    pub fn sort_by_score(&mut self) {
        self.items.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    /// Returns `true` when scores never increase along the list.
    pub fn is_sorted_by_score(&self) -> bool {
        self.items.windows(2).all(|w| w[0].score >= w[1].score)
    }

    pub(crate) fn items_mut(&mut self) -> &mut [Detection] {
        &mut self.items
    }

    /// Drops entries whose tombstone is set, preserving order.
    pub(crate) fn compact(&mut self, discarded: &[bool]) {
        let mut idx = 0;
        self.items.retain(|_| {
            let keep = !discarded[idx];
            idx += 1;
            keep
        });
    }
}

impl From<Vec<Detection>> for DetectionList {
    fn from(items: Vec<Detection>) -> Self {
        Self { items }
    }
}

impl FromIterator<Detection> for DetectionList {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DetectionList {
    type Item = Detection;
    type IntoIter = std::vec::IntoIter<Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DetectionList {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
