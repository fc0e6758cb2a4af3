use serde::{Deserialize, Serialize};
use crate::error::GeometryError;

/// Axis-aligned detector box in image-pixel space (or `[0,1]` once normalized).
///
/// Every geometry method returns a new value and leaves `self` untouched. None of
/// them validate implicitly; call [`BvrBox::is_valid`] or [`BvrBox::validate`] first
/// when malformed input matters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BvrBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,

    pub confidence: f32,
    pub class_id: isize,
}

impl BvrBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: isize) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
            class_id,
        }
    }

    /// Like [`BvrBox::new`] but rejects NaN or infinite coordinates and confidence.
    pub fn try_new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: isize) -> Result<Self, GeometryError> {
        let b = Self::new(x1, y1, x2, y2, confidence, class_id);
        b.check_finite()?;
        Ok(b)
    }

    fn check_finite(&self) -> Result<(), GeometryError> {
        let fields = [
            ("x1", self.x1),
            ("y1", self.y1),
            ("x2", self.x2),
            ("y2", self.y2),
            ("confidence", self.confidence),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite { field, value });
            }
        }
        Ok(())
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Returns `width / height`.
    ///
    /// Height must be non-zero: a zero-height box yields an infinite ratio, or NaN
    /// when the width is zero as well. Validate first if that matters.
    pub fn aspect_ratio(&self) -> f32 {
        self.width() / self.height()
    }

    /// Returns the center point `(cx, cy)`.
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2., (self.y1 + self.y2) / 2.)
    }

    /// Returns the bounding box coordinates as `(x1, y1, x2, y2)`.
    pub fn xy1_xy2(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Returns the bounding box coordinates and size as `(x, y, w, h)`.
    pub fn xy1_wh(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.width(), self.height())
    }

    /// Returns the center coordinates and size of the bounding box as `(cx, cy, w, h)`.
    pub fn cxy_wh(&self) -> (f32, f32, f32, f32) {
        let (cx, cy) = self.center();
        (cx, cy, self.width(), self.height())
    }

    /// Computes the area of the bounding box.
    ///
    /// Non-negative for valid boxes. Inverted boxes can produce a negative or zero
    /// area; this is not checked.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Computes the perimeter of the bounding box.
    pub fn perimeter(&self) -> f32 {
        (self.width() + self.height()) * 2.
    }

    /// Computes the intersection area between this bounding box and another.
    ///
    /// Disjoint or edge-touching boxes give exactly `0.0`, never a negative area.
    pub fn intersection_area(&self, other: &BvrBox) -> f32 {
        let left = self.x1.max(other.x1);
        let top = self.y1.max(other.y1);
        let right = self.x2.min(other.x2);
        let bottom = self.y2.min(other.y2);

        if right <= left || bottom <= top {
            return 0.;
        }
        (right - left) * (bottom - top)
    }

    /// Computes the union area between this bounding box and another.
    pub fn union_area(&self, other: &BvrBox) -> f32 {
        self.area() + other.area() - self.intersection_area(other)
    }

    /// Computes the intersection over union (IoU) between this bounding box and another.
    ///
    /// Returns `0.0` when the union is zero (both boxes degenerate).
    pub fn iou(&self, other: &BvrBox) -> f32 {
        let union = self.union_area(other);
        if union == 0. {
            return 0.;
        }
        self.intersection_area(other) / union
    }

    /// Euclidean distance between the two box centers.
    pub fn distance(&self, other: &BvrBox) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (ax - bx).hypot(ay - by)
    }

    /// Checks whether the point lies in the box. Edges count as inside.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        self.x1 <= px && px <= self.x2 && self.y1 <= py && py <= self.y2
    }

    /// Checks if this bounding box completely contains another bounding box `other`.
    pub fn contains(&self, other: &BvrBox) -> bool {
        self.x1 <= other.x1
            && self.x2 >= other.x2
            && self.y1 <= other.y1
            && self.y2 >= other.y2
    }

    /// Minimal box enclosing both inputs.
    ///
    /// Only the geometry is merged; confidence and class id are copied from `self`
    /// and are the caller's to overwrite.
    pub fn merge(&self, other: &BvrBox) -> BvrBox {
        BvrBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
            ..*self
        }
    }

    /// Constrains the bottom-right corner to the image: `x2 <= img_w`, `y2 <= img_h`.
    ///
    /// `x1` and `y1` are left as they are, so a box that starts beyond the image edge
    /// is not corrected. Use [`BvrBox::clamp`] for a clamp of all four coordinates.
    pub fn clip(&self, img_w: f32, img_h: f32) -> BvrBox {
        BvrBox {
            x2: self.x2.min(img_w),
            y2: self.y2.min(img_h),
            ..*self
        }
    }

    /// Clamps every coordinate into `[0, img_w]` x `[0, img_h]`.
    pub fn clamp(&self, img_w: f32, img_h: f32) -> BvrBox {
        BvrBox {
            x1: self.x1.max(0.).min(img_w),
            y1: self.y1.max(0.).min(img_h),
            x2: self.x2.max(0.).min(img_w),
            y2: self.y2.max(0.).min(img_h),
            ..*self
        }
    }

    /// Scales width and height by `factor` around the box center.
    pub fn scale(&self, factor: f32) -> BvrBox {
        let (cx, cy, w, h) = self.cxy_wh();
        (*self).with_cxcy_wh(cx, cy, w * factor, h * factor)
    }

    /// Divides x coordinates by `img_w` and y coordinates by `img_h`.
    ///
    /// Zero image dimensions are not guarded against and produce infinities.
    pub fn normalize(&self, img_w: f32, img_h: f32) -> BvrBox {
        BvrBox {
            x1: self.x1 / img_w,
            y1: self.y1 / img_h,
            x2: self.x2 / img_w,
            y2: self.y2 / img_h,
            ..*self
        }
    }

    /// Inverse of [`BvrBox::normalize`]: multiplies by the image dimensions.
    pub fn denormalize(&self, img_w: f32, img_h: f32) -> BvrBox {
        BvrBox {
            x1: self.x1 * img_w,
            y1: self.y1 * img_h,
            x2: self.x2 * img_w,
            y2: self.y2 * img_h,
            ..*self
        }
    }

    /// True iff `x1 < x2`, `y1 < y2`, `x1 >= 0` and `y1 >= 0`.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Same check as [`BvrBox::is_valid`], reporting the first failed condition.
    pub fn validate(&self) -> Result<(), GeometryError> {
        self.check_finite()?;
        if self.x1 < 0. || self.y1 < 0. {
            return Err(GeometryError::NegativeOrigin { x1: self.x1, y1: self.y1 });
        }
        if self.x1 >= self.x2 || self.y1 >= self.y2 {
            return Err(GeometryError::EmptyExtent { width: self.width(), height: self.height() });
        }
        Ok(())
    }

    pub fn as_x1y1_x2y2_i32(&self) -> (i32, i32, i32, i32) {
        (self.x1.round() as i32,
         self.y1.round() as i32,
         self.x2.round() as i32,
         self.y2.round() as i32)
    }

    /// Sets the bounding box's coordinates using `(x1, y1, x2, y2)`.
    ///
    /// # Arguments
    ///
    /// * `x1` - The x-coordinate of the top-left corner.
    /// * `y1` - The y-coordinate of the top-left corner.
    /// * `x2` - The x-coordinate of the bottom-right corner.
    /// * `y2` - The y-coordinate of the bottom-right corner.
    ///
    /// # Returns
    ///
    /// A `BvrBox` instance with updated coordinates.
    pub fn with_x1y1_x2y2(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Sets the bounding box's coordinates using `(x, y, w, h)`.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the top-left corner.
    /// * `y` - The y-coordinate of the top-left corner.
    /// * `w` - The width of the bounding box.
    /// * `h` - The height of the bounding box.
    ///
    /// # Returns
    ///
    /// A `BvrBox` instance with updated coordinates.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Sets the bounding box's coordinates using `(cx, cy, w, h)`.
    ///
    /// # Arguments
    ///
    /// * `cx` - The x-coordinate of the horizontal center.
    /// * `cy` - The y-coordinate of the vertical center.
    /// * `w` - The width of the bounding box.
    /// * `h` - The height of the bounding box.
    ///
    /// # Returns
    ///
    /// A `BvrBox` instance with updated coordinates.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - (w / 2.0);
        self.y1 = cy - (h / 2.0);
        self.x2 = cx + (w / 2.0);
        self.y2 = cy + (h / 2.0);
        self
    }

    pub fn with_confidence(mut self, conf: f32) -> Self {
        self.confidence = conf;
        self
    }

    pub fn with_class_id(mut self, class_id: isize) -> Self {
        self.class_id = class_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BvrBox {
        BvrBox::new(10., 20., 50., 80., 0.95, 1)
    }

    fn overlapping() -> BvrBox {
        BvrBox::new(30., 40., 70., 100., 0.85, 1)
    }

    fn far_away() -> BvrBox {
        BvrBox::new(100., 100., 150., 150., 0.90, 1)
    }

    #[test]
    fn area_width_height() {
        let b = sample();
        assert_eq!(b.width(), 40.);
        assert_eq!(b.height(), 60.);
        assert_eq!(b.area(), 2400.);
        assert_eq!(b.perimeter(), 200.);
    }

    #[test]
    fn intersection_union_iou() {
        let (a, b) = (sample(), overlapping());
        assert_eq!(a.intersection_area(&b), 800.);
        // Both boxes are 40x60.
        assert_eq!(overlapping().area(), 2400.);
        assert_eq!(a.union_area(&b), 4000.);
        assert!((a.iou(&b) - 0.2).abs() < 1e-6);
        assert_eq!(a.iou(&b), b.iou(&a));
    }

    #[test]
    fn disjoint_boxes_have_no_overlap() {
        let (a, b) = (sample(), far_away());
        assert_eq!(a.intersection_area(&b), 0.);
        assert_eq!(a.iou(&b), 0.);
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = BvrBox::new(0., 0., 10., 10., 1., 0);
        let b = BvrBox::new(10., 0., 20., 10., 1., 0);
        assert_eq!(a.intersection_area(&b), 0.);
    }

    #[test]
    fn self_iou_is_exactly_one() {
        let b = sample();
        assert_eq!(b.iou(&b), 1.0);
    }

    #[test]
    fn degenerate_union_gives_zero_iou() {
        let p = BvrBox::new(5., 5., 5., 5., 0.5, 0);
        assert_eq!(p.iou(&p), 0.);
    }

    #[test]
    fn center_and_distance() {
        let (a, b) = (sample(), far_away());
        assert_eq!(a.center(), (30., 50.));
        let expected = ((30f32 - 125.).powi(2) + (50f32 - 125.).powi(2)).sqrt();
        assert!((a.distance(&b) - expected).abs() < 1e-4);
        assert_eq!(a.distance(&a), 0.);
    }

    #[test]
    fn aspect_ratio_and_zero_height() {
        assert!((sample().aspect_ratio() - 40. / 60.).abs() < 1e-6);
        let flat = BvrBox::new(0., 5., 10., 5., 1., 0);
        assert!(flat.aspect_ratio().is_infinite());
    }

    #[test]
    fn contains_point_closed_interval() {
        let b = sample();
        assert!(b.contains_point(30., 50.));
        assert!(b.contains_point(10., 20.));
        assert!(b.contains_point(50., 80.));
        assert!(!b.contains_point(100., 100.));
        assert!(!b.contains_point(9.99, 50.));
    }

    #[test]
    fn merge_encloses_both() {
        let m = sample().merge(&overlapping());
        assert_eq!(m.xy1_xy2(), (10., 20., 70., 100.));
    }

    #[test]
    fn clip_only_bounds_bottom_right() {
        let b = BvrBox::new(10., 20., 150., 180., 0.7, 3);
        let c = b.clip(100., 100.);
        assert_eq!(c.xy1_xy2(), (10., 20., 100., 100.));
        assert_eq!(c.confidence, 0.7);
        assert_eq!(c.class_id, 3);

        let outside = BvrBox::new(120., 130., 150., 180., 0.7, 3).clip(100., 100.);
        assert_eq!(outside.x1, 120.);
        assert_eq!(outside.y1, 130.);
    }

    #[test]
    fn clamp_bounds_every_coordinate() {
        let b = BvrBox::new(-5., 130., 150., 180., 0.7, 3).clamp(100., 100.);
        assert_eq!(b.xy1_xy2(), (0., 100., 100., 100.));
    }

    #[test]
    fn scale_around_center() {
        let b = sample().scale(2.0);
        assert_eq!(b.xy1_xy2(), (-10., -10., 70., 110.));
        assert_eq!(b.center(), sample().center());
        assert_eq!(b.confidence, 0.95);
    }

    #[test]
    fn normalize_and_denormalize() {
        let n = sample().normalize(200., 200.);
        assert!((n.x1 - 0.05).abs() < 1e-6);
        assert!((n.y1 - 0.1).abs() < 1e-6);
        assert!((n.x2 - 0.25).abs() < 1e-6);
        assert!((n.y2 - 0.4).abs() < 1e-6);
        assert_eq!(n.confidence, 0.95);
        assert_eq!(n.class_id, 1);

        let d = BvrBox::new(0.1, 0.2, 0.5, 0.8, 1., 0).denormalize(200., 200.);
        assert!((d.x1 - 20.).abs() < 1e-4);
        assert!((d.y1 - 40.).abs() < 1e-4);
        assert!((d.x2 - 100.).abs() < 1e-4);
        assert!((d.y2 - 160.).abs() < 1e-4);
    }

    #[test]
    fn validation() {
        assert!(sample().is_valid());
        assert!(!BvrBox::new(50., 20., 10., 80., 0.95, 1).is_valid());
        assert!(!BvrBox::new(10., 80., 50., 20., 0.95, 1).is_valid());
        assert!(!BvrBox::new(-10., 20., 50., 80., 0.95, 1).is_valid());
        assert!(!BvrBox::new(10., 20., 10., 80., 0.95, 1).is_valid());

        assert_eq!(
            BvrBox::new(-1., 2., 5., 5., 0.5, 0).validate(),
            Err(GeometryError::NegativeOrigin { x1: -1., y1: 2. })
        );
    }

    #[test]
    fn try_new_rejects_non_finite() {
        assert!(BvrBox::try_new(0., 0., 1., 1., 0.5, 0).is_ok());
        let err = BvrBox::try_new(0., f32::NAN, 1., 1., 0.5, 0).unwrap_err();
        assert!(matches!(err, GeometryError::NonFinite { field: "y1", .. }));
        assert!(BvrBox::try_new(0., 0., f32::INFINITY, 1., 0.5, 0).is_err());
    }

    #[test]
    fn builders() {
        let b = BvrBox::default().with_x1y1_wh(10., 20., 40., 60.).with_confidence(0.3).with_class_id(7);
        assert_eq!(b, BvrBox::new(10., 20., 50., 80., 0.3, 7));
        let c = BvrBox::default().with_cxcy_wh(30., 50., 40., 60.);
        assert_eq!(c.xy1_xy2(), (10., 20., 50., 80.));
        assert_eq!(c.as_x1y1_x2y2_i32(), (10, 20, 50, 80));
    }
}
