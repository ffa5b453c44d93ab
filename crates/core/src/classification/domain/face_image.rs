use std::fmt;

use ndarray::ArrayD;

use crate::classification::domain::classification_error::InferenceError;

/// Element types a classifier input may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    Float32,
    Uint8,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Float32 => write!(f, "f32"),
            ElementType::Uint8 => write!(f, "u8"),
        }
    }
}

/// One cropped face, already shaped like the model input (batch of one).
#[derive(Clone, Debug, PartialEq)]
pub enum FaceImage {
    Float32(ArrayD<f32>),
    Uint8(ArrayD<u8>),
}

impl FaceImage {
    pub fn shape(&self) -> &[usize] {
        match self {
            FaceImage::Float32(a) => a.shape(),
            FaceImage::Uint8(a) => a.shape(),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            FaceImage::Float32(_) => ElementType::Float32,
            FaceImage::Uint8(_) => ElementType::Uint8,
        }
    }
}

/// Channel placement of a 4-D image tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[N, H, W, C]`, the usual layout of converted Keras/TFLite models.
    Nhwc,
    /// `[N, C, H, W]`.
    Nchw,
}

/// Input size used when the model leaves spatial dimensions dynamic.
pub const FALLBACK_INPUT_SIZE: usize = 224;

/// Descriptor of a model tensor, resolved once when the model is loaded.
///
/// Negative dimensions are dynamic and match any size.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorSpec {
    pub name: String,
    pub index: usize,
    pub shape: Vec<i64>,
    pub element_type: ElementType,
}

impl TensorSpec {
    /// Layout of a 4-D image input. Defaults to NHWC when the channel axis
    /// can't be told apart.
    pub fn layout(&self) -> TensorLayout {
        match self.shape.as_slice() {
            [_, c, _, h] if *c == 3 && *h != 3 => TensorLayout::Nchw,
            _ => TensorLayout::Nhwc,
        }
    }

    /// `(height, width)` of a 4-D image input.
    pub fn image_size(&self) -> (usize, usize) {
        let dim = |d: Option<&i64>| match d {
            Some(&v) if v > 0 => v as usize,
            _ => FALLBACK_INPUT_SIZE,
        };
        match self.layout() {
            TensorLayout::Nhwc => (dim(self.shape.get(1)), dim(self.shape.get(2))),
            TensorLayout::Nchw => (dim(self.shape.get(2)), dim(self.shape.get(3))),
        }
    }

    /// Checks that a face tensor can be fed to this input.
    pub fn check(&self, face: &FaceImage) -> Result<(), InferenceError> {
        if face.element_type() != self.element_type {
            return Err(InferenceError::ElementTypeMismatch {
                expected: self.element_type,
                actual: face.element_type(),
            });
        }
        let actual = face.shape();
        let matches = actual.len() == self.shape.len()
            && self
                .shape
                .iter()
                .zip(actual)
                .all(|(&want, &got)| want < 0 || want as usize == got);
        if !matches {
            return Err(InferenceError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }
}
