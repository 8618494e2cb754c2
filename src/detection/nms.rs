//! Greedy non-maximum suppression over a score-sorted list.

use crate::detection::DetectionList;
use crate::geometry::OverlapMetric;
use crate::trace::{trace_event, trace_span};
use crate::util::math::check_unit_threshold;
use crate::util::AnchorKitResult;

/// Removes every entry that overlaps a higher-ranked survivor by more than
/// `threshold` under `metric`.
///
/// The list is walked in order, so it must already be sorted by descending
/// score (see [`DetectionList::merge_sorted`]); the first entry always
/// survives. Survivors keep their relative order. Entries of different
/// categories still suppress each other, as in the single-category
/// detectors this targets.
pub fn suppress(
    list: &mut DetectionList,
    threshold: f32,
    metric: OverlapMetric,
) -> AnchorKitResult<()> {
    check_unit_threshold("nms_threshold", threshold)?;
    let _span = trace_span!("nms", candidates = list.len()).entered();

    let items = list.as_slice();
    let mut discarded = vec![false; items.len()];
    for i in 0..items.len() {
        if discarded[i] {
            continue;
        }
        let kept = items[i].bbox;
        for j in (i + 1)..items.len() {
            if !discarded[j] && kept.overlap(&items[j].bbox, metric) > threshold {
                discarded[j] = true;
            }
        }
    }

    list.compact(&discarded);
    trace_event!("nms_survivors", count = list.len());
    Ok(())
}
