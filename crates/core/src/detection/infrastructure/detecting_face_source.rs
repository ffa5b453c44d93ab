use crate::classification::domain::face_image::TensorSpec;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_source::{DetectedFace, FaceSource};
use crate::detection::infrastructure::face_cropper::FaceCropper;
use crate::shared::frame::Frame;

/// Face source built from a detector and a cropper sized for the classifier.
///
/// Regions that fall entirely outside the frame are dropped, so every
/// returned face has a crop.
pub struct DetectingFaceSource {
    detector: Box<dyn FaceDetector>,
    cropper: FaceCropper,
}

impl DetectingFaceSource {
    pub fn new(detector: Box<dyn FaceDetector>, classifier_input: &TensorSpec) -> Self {
        Self {
            detector,
            cropper: FaceCropper::new(classifier_input),
        }
    }
}

impl FaceSource for DetectingFaceSource {
    fn faces(
        &mut self,
        frame: &Frame,
        face_probability: f64,
    ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
        let regions = self.detector.detect(frame, face_probability)?;
        let faces: Vec<DetectedFace> = regions
            .into_iter()
            .filter_map(|region| {
                let image = self.cropper.crop(frame, &region)?;
                Some(DetectedFace {
                    region: region.clamped(frame.width(), frame.height()),
                    image,
                })
            })
            .collect();
        log::debug!("Frame {}: {} face(s)", frame.index(), faces.len());
        Ok(faces)
    }
}
