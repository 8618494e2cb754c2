//! In-place coordinate calibration of detection lists.

use crate::detection::DetectionList;
use crate::geometry::BBox;

/// Applies each entry's stored offset to its box and clamps to the image.
///
/// With `(w, h)` the current box size: the left and top edges move by
/// `offset.x1 * w` and `offset.y1 * w` (the top edge is scaled by the width,
/// following the anchor-offset convention of the detectors this serves) and
/// are clamped at zero. The right and bottom edges move by `offset.x2 * w`
/// and `offset.y2 * h`; an edge that passes the image bound is pinned to the
/// last pixel and the opposite edge is moved so the original size is kept.
pub fn calibrate_by_offset(list: &mut DetectionList, image_height: usize, image_width: usize) {
    let img_w = image_width as f32;
    let img_h = image_height as f32;
    for det in list.items_mut() {
        let b = det.bbox;
        let off = det.offset;
        let (w, h) = b.width_height();

        let mut x1 = (b.x1 + off.x1 * w).max(0.0);
        let mut y1 = (b.y1 + off.y1 * w).max(0.0);
        let mut x2 = b.x2 + off.x2 * w;
        if x2 > img_w {
            x2 = img_w - 1.0;
            x1 = img_w - w;
        }
        let mut y2 = b.y2 + off.y2 * h;
        if y2 > img_h {
            y2 = img_h - 1.0;
            y1 = img_h - h;
        }
        det.bbox = BBox::new(x1, y1, x2, y2);
    }
}

/// Converts landmarks from box-relative fractions to image coordinates.
pub fn calibrate_landmarks(list: &mut DetectionList) {
    for det in list.items_mut() {
        let (w, h) = det.bbox.width_height();
        for point in det.landmarks.0.chunks_exact_mut(2) {
            point[0] = det.bbox.x1 + point[0] * w;
            point[1] = det.bbox.y1 + point[1] * h;
        }
    }
}
