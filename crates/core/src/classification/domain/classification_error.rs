use std::path::PathBuf;

use thiserror::Error;

use crate::classification::domain::face_image::ElementType;

/// Raised while building a classifier. No classifier exists afterwards.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("model file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to load model {path}: {source}")]
    Engine {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },
    #[error("model {path} has {count} inputs, expected exactly one image input")]
    InputCount { path: PathBuf, count: usize },
    #[error("model {path} has no outputs")]
    NoOutputs { path: PathBuf },
    #[error("model {path}: tensor `{name}` is unsupported ({detail})")]
    UnsupportedTensor {
        path: PathBuf,
        name: String,
        detail: String,
    },
}

/// Raised by a single forward pass. Never retried.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("face tensor shape {actual:?} does not match model input {expected:?}")]
    ShapeMismatch { expected: Vec<i64>, actual: Vec<usize> },
    #[error("face tensor is {actual}, model input expects {expected}")]
    ElementTypeMismatch {
        expected: ElementType,
        actual: ElementType,
    },
    #[error("model produced an empty output tensor")]
    EmptyOutput,
    #[error("inference engine failed: {0}")]
    Engine(#[from] ort::Error),
    /// Failure reported by an engine other than ONNX Runtime.
    #[error("inference backend failed: {0}")]
    Backend(String),
}
