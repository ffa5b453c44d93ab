use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// Only boxes scoring at least `min_confidence` are returned, in descending
/// score order. `&mut self` because ONNX sessions need exclusive access.
pub trait FaceDetector: Send {
    fn detect(
        &mut self,
        frame: &Frame,
        min_confidence: f64,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
