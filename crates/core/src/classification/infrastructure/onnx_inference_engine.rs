/// Mask classifier backend using ONNX Runtime via `ort`.
///
/// Expects a quantized binary classifier with one image input and a scalar
/// "no mask" probability as the first element of its first output.
use std::path::{Path, PathBuf};

use crate::classification::domain::classification_error::{InferenceError, ModelLoadError};
use crate::classification::domain::face_image::{ElementType, FaceImage, TensorSpec};
use crate::classification::domain::inference_engine::InferenceEngine;
use crate::classification::domain::mask_classifier::MaskClassifier;
use crate::shared::onnx_session::open_session;

pub struct OnnxInferenceEngine {
    session: ort::session::Session,
    input: TensorSpec,
    output: TensorSpec,
}

impl OnnxInferenceEngine {
    /// Load a model and resolve its input and output descriptors.
    pub fn load(model_path: &Path) -> Result<Self, ModelLoadError> {
        if !model_path.is_file() {
            return Err(ModelLoadError::NotFound(model_path.to_path_buf()));
        }
        let session = open_session(model_path).map_err(|source| ModelLoadError::Engine {
            path: model_path.to_path_buf(),
            source,
        })?;

        let inputs = session.inputs();
        if inputs.len() != 1 {
            return Err(ModelLoadError::InputCount {
                path: model_path.to_path_buf(),
                count: inputs.len(),
            });
        }
        let input = describe(model_path, 0, inputs[0].name(), inputs[0].dtype())?;
        if input.shape.len() != 4 {
            return Err(ModelLoadError::UnsupportedTensor {
                path: model_path.to_path_buf(),
                name: input.name,
                detail: format!("expected a 4-D image input, got shape {:?}", input.shape),
            });
        }

        let output = session
            .outputs()
            .first()
            .ok_or_else(|| ModelLoadError::NoOutputs {
                path: model_path.to_path_buf(),
            })
            .and_then(|o| describe(model_path, 0, o.name(), o.dtype()))?;

        log::info!(
            "Loaded mask model {} (input `{}` {:?} {}, output `{}`)",
            model_path.display(),
            input.name,
            input.shape,
            input.element_type,
            output.name
        );

        Ok(Self {
            session,
            input,
            output,
        })
    }
}

impl MaskClassifier {
    /// Build a classifier backed by ONNX Runtime.
    pub fn load(model_path: &Path) -> Result<Self, ModelLoadError> {
        Ok(Self::new(Box::new(OnnxInferenceEngine::load(model_path)?)))
    }
}

impl InferenceEngine for OnnxInferenceEngine {
    fn input_spec(&self) -> &TensorSpec {
        &self.input
    }

    fn predict(&mut self, face: &FaceImage) -> Result<f32, InferenceError> {
        self.input.check(face)?;

        let outputs = match face {
            FaceImage::Float32(array) => {
                let value = ort::value::Tensor::from_array(array.clone())?;
                self.session.run(ort::inputs![value])?
            }
            FaceImage::Uint8(array) => {
                let value = ort::value::Tensor::from_array(array.clone())?;
                self.session.run(ort::inputs![value])?
            }
        };

        let output = &outputs[self.output.index];
        let probability = match self.output.element_type {
            ElementType::Float32 => output.try_extract_array::<f32>()?.iter().next().copied(),
            ElementType::Uint8 => output
                .try_extract_array::<u8>()?
                .iter()
                .next()
                .map(|&v| dequantize(v)),
        };
        probability.ok_or(InferenceError::EmptyOutput)
    }
}

/// Quantized outputs span the full byte range.
fn dequantize(v: u8) -> f32 {
    v as f32 / 255.0
}

fn describe(
    model_path: &Path,
    index: usize,
    name: &str,
    dtype: &ort::value::ValueType,
) -> Result<TensorSpec, ModelLoadError> {
    let unsupported = |detail: String| ModelLoadError::UnsupportedTensor {
        path: PathBuf::from(model_path),
        name: name.to_string(),
        detail,
    };
    let ort::value::ValueType::Tensor { ty, shape, .. } = dtype else {
        return Err(unsupported(format!("not a tensor: {dtype:?}")));
    };
    let element_type = element_type(*ty).ok_or_else(|| unsupported(format!("{ty:?}")))?;
    Ok(TensorSpec {
        name: name.to_string(),
        index,
        shape: shape.iter().copied().collect(),
        element_type,
    })
}

fn element_type(ty: ort::value::TensorElementType) -> Option<ElementType> {
    match ty {
        ort::value::TensorElementType::Float32 => Some(ElementType::Float32),
        ort::value::TensorElementType::Uint8 => Some(ElementType::Uint8),
        _ => None,
    }
}
