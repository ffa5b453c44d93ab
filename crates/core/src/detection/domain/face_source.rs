use crate::classification::domain::face_image::FaceImage;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// A face found in a frame: where it is, and the crop the classifier sees.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedFace {
    pub region: Region,
    pub image: FaceImage,
}

/// Supplies the faces of one frame, ready for classification.
///
/// `face_probability` is the minimum detector confidence for a face to be
/// reported.
pub trait FaceSource: Send {
    fn faces(
        &mut self,
        frame: &Frame,
        face_probability: f64,
    ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>>;
}
