//! Box geometry with inclusive pixel corners.
//!
//! A box `[x1, y1, x2, y2]` covers pixels `x1..=x2` and `y1..=y2`, so widths
//! and heights always carry a `+ 1`.

/// Axis-aligned box with inclusive corners.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a box from a `[x1, y1, x2, y2]` slice of at least four values.
    pub(crate) fn from_slice(values: &[f32]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Returns `(x2 - x1 + 1, y2 - y1 + 1)`.
    #[inline]
    pub fn width_height(&self) -> (f32, f32) {
        (self.x2 - self.x1 + 1.0, self.y2 - self.y1 + 1.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        let (w, h) = self.width_height();
        w * h
    }

    /// Overlap area with `other`, zero when the boxes are disjoint.
    #[inline]
    pub fn intersection(&self, other: &BBox) -> f32 {
        let iw = (self.x2.min(other.x2) - self.x1.max(other.x1) + 1.0).max(0.0);
        let ih = (self.y2.min(other.y2) - self.y1.max(other.y1) + 1.0).max(0.0);
        iw * ih
    }

    /// Overlap ratio with `other` under `metric`.
    pub fn overlap(&self, other: &BBox, metric: OverlapMetric) -> f32 {
        let inter = self.intersection(other);
        if inter <= 0.0 {
            return 0.0;
        }
        let denom = match metric {
            OverlapMetric::Iou => self.area() + other.area() - inter,
            OverlapMetric::MinArea => self.area().min(other.area()),
        };
        if denom <= 0.0 {
            return 0.0;
        }
        inter / denom
    }
}

/// How two boxes' overlap is normalized during suppression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlapMetric {
    /// Intersection over union.
    #[default]
    Iou,
    /// Intersection over the smaller area, so a box nested inside a much
    /// larger one still counts as a duplicate.
    MinArea,
}

/// Five facial landmarks stored as `x0, y0, x1, y1, ..., x4, y4`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmarks(pub [f32; 10]);

impl Landmarks {
    pub const POINTS: usize = 5;

    /// Returns point `i` as `(x, y)`.
    pub fn point(&self, i: usize) -> (f32, f32) {
        (self.0[2 * i], self.0[2 * i + 1])
    }

    /// Iterates over all points as `(x, y)`.
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        (0..Self::POINTS).map(move |i| self.point(i))
    }

    pub(crate) fn from_slice(values: &[f32]) -> Self {
        let mut points = [0.0; 10];
        points.copy_from_slice(&values[..10]);
        Self(points)
    }
}

/// Expands every box to a square of side `max(w, h)` centered on the
/// original, shifting it back inside `[0, width) x [0, height)` when it
/// would overflow.
///
/// Squares larger than the image are reduced to the smaller image dimension
/// so the output always fits.
pub fn rect_to_square(boxes: &mut [BBox], width: usize, height: usize) {
    let img_w = width as f32;
    let img_h = height as f32;
    let max_side = img_w.min(img_h);
    for b in boxes.iter_mut() {
        let (w, h) = b.width_height();
        let side = w.max(h).min(max_side);

        let x1 = (b.x1.max(0.0) + 0.5 * (w - side)).round().max(0.0);
        let y1 = (b.y1.max(0.0) + 0.5 * (h - side)).round().max(0.0);
        let (x1, x2) = fit_span(x1, side, img_w);
        let (y1, y2) = fit_span(y1, side, img_h);
        *b = BBox::new(x1, y1, x2, y2);
    }
}

fn fit_span(start: f32, side: f32, limit: f32) -> (f32, f32) {
    let end = start + side - 1.0;
    if end > limit - 1.0 {
        (limit - side, limit - 1.0)
    } else {
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::{rect_to_square, BBox, Landmarks, OverlapMetric};

    #[test]
    fn width_height_is_inclusive() {
        let b = BBox::new(0.0, 0.0, 9.0, 4.0);
        assert_eq!(b.width_height(), (10.0, 5.0));
        assert_eq!(b.area(), 50.0);
    }

    #[test]
    fn overlap_matches_known_values() {
        let a = BBox::new(0.0, 0.0, 9.0, 9.0);
        let b = BBox::new(5.0, 5.0, 14.0, 14.0);
        assert_eq!(a.intersection(&b), 25.0);
        assert!((a.overlap(&b, OverlapMetric::Iou) - 25.0 / 175.0).abs() < 1e-6);
        assert!((a.overlap(&b, OverlapMetric::MinArea) - 0.25).abs() < 1e-6);

        let far = BBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.overlap(&far, OverlapMetric::Iou), 0.0);
    }

    #[test]
    fn nested_box_is_full_overlap_by_min_area() {
        let outer = BBox::new(0.0, 0.0, 99.0, 99.0);
        let inner = BBox::new(10.0, 10.0, 19.0, 19.0);
        assert!((outer.overlap(&inner, OverlapMetric::MinArea) - 1.0).abs() < 1e-6);
        assert!(outer.overlap(&inner, OverlapMetric::Iou) < 0.02);
    }

    #[test]
    fn rect_to_square_centers_and_shifts() {
        let mut boxes = [
            BBox::new(10.0, 10.0, 19.0, 29.0),
            BBox::new(90.0, 0.0, 99.0, 29.0),
        ];
        rect_to_square(&mut boxes, 100, 100);

        assert_eq!(boxes[0], BBox::new(5.0, 10.0, 24.0, 29.0));
        // Would end at x = 109, shifted left to stay inside the image.
        assert_eq!(boxes[1], BBox::new(70.0, 0.0, 99.0, 29.0));
    }

    #[test]
    fn rect_to_square_rounds_half_offsets_away_from_zero() {
        // w = 10, h = 21: the centering offset is 10 - 5.5 = 4.5.
        let mut boxes = [BBox::new(10.0, 0.0, 19.0, 20.0)];
        rect_to_square(&mut boxes, 100, 100);
        assert_eq!(boxes[0], BBox::new(5.0, 0.0, 25.0, 20.0));

        // Vertical: 21 - 0.5 = 20.5 rounds to 21, not to the even 20.
        let mut boxes = [BBox::new(0.0, 21.0, 9.0, 29.0)];
        rect_to_square(&mut boxes, 100, 100);
        assert_eq!(boxes[0], BBox::new(0.0, 21.0, 9.0, 30.0));
    }

    #[test]
    fn landmark_points_iterate_in_order() {
        let lm = Landmarks([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let points: Vec<(f32, f32)> = lm.points().collect();
        assert_eq!(points.len(), Landmarks::POINTS);
        assert_eq!(points[0], (0.0, 1.0));
        assert_eq!(points[4], (8.0, 9.0));
    }

    #[test]
    fn rect_to_square_caps_oversized_boxes() {
        let mut boxes = [BBox::new(0.0, 0.0, 119.0, 9.0)];
        rect_to_square(&mut boxes, 100, 50);
        let (w, h) = boxes[0].width_height();
        assert_eq!(w, h);
        assert_eq!(w, 50.0);
        assert!(boxes[0].x1 >= 0.0 && boxes[0].x2 <= 99.0);
        assert!(boxes[0].y1 >= 0.0 && boxes[0].y2 <= 49.0);
    }
}
