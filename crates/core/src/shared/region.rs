/// An axis-aligned face bounding box in frame pixel coordinates.
///
/// `confidence` is the detector score that produced the box; it is what the
/// `face_probability` threshold is compared against.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f64,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(&self) -> f64 {
        self.width.max(0) as f64 * self.height.max(0) as f64
    }

    pub fn iou(&self, other: &Region) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }

    /// Intersects the box with a `frame_width × frame_height` frame.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> Region {
        let x1 = self.x.clamp(0, frame_width as i32);
        let y1 = self.y.clamp(0, frame_height as i32);
        let x2 = (self.x + self.width).clamp(0, frame_width as i32);
        let y2 = (self.y + self.height).clamp(0, frame_height as i32);
        Region {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            confidence: self.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn region(x: i32, y: i32, w: i32, h: i32) -> Region {
        Region::new(x, y, w, h, 1.0)
    }

    #[test]
    fn test_iou_identical_regions() {
        let a = region(10, 10, 100, 100);
        assert_relative_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn test_iou_partial_overlap() {
        // intersection 50*100, union 10000 + 10000 - 5000
        let a = region(0, 0, 100, 100);
        let b = region(50, 0, 100, 100);
        assert_relative_eq!(a.iou(&b), 5000.0 / 15000.0);
    }

    #[rstest]
    #[case(region(0, 0, 50, 50), region(100, 100, 50, 50))]
    #[case(region(0, 0, 50, 50), region(50, 0, 50, 50))]
    fn test_iou_disjoint_is_zero(#[case] a: Region, #[case] b: Region) {
        assert_relative_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_clamped_inside_frame_is_unchanged() {
        let r = region(10, 20, 30, 40);
        assert_eq!(r.clamped(100, 100), r);
    }

    #[test]
    fn test_clamped_cuts_overhanging_edges() {
        let r = region(-10, 90, 30, 40).clamped(100, 100);
        assert_eq!((r.x, r.y, r.width, r.height), (0, 90, 20, 10));
    }

    #[test]
    fn test_clamped_outside_frame_is_empty() {
        assert!(region(200, 200, 10, 10).clamped(100, 100).is_empty());
    }
}
