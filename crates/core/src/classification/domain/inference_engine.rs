use crate::classification::domain::classification_error::InferenceError;
use crate::classification::domain::face_image::{FaceImage, TensorSpec};

/// A loaded binary classifier: one fixed-shape face in, one probability out.
///
/// The returned value is the model's probability that the face is **not**
/// wearing a mask. Engines reuse internal buffers between calls, so a single
/// engine must be driven sequentially, hence `&mut self`.
pub trait InferenceEngine: Send {
    /// Descriptor of the image input, resolved when the model was loaded.
    fn input_spec(&self) -> &TensorSpec;

    fn predict(&mut self, face: &FaceImage) -> Result<f32, InferenceError>;
}
