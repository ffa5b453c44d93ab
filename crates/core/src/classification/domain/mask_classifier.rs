use crate::classification::domain::classification_error::InferenceError;
use crate::classification::domain::face_image::{FaceImage, TensorSpec};
use crate::classification::domain::inference_engine::InferenceEngine;
use crate::classification::domain::mask_label::ClassificationResult;

/// Labels each cropped face as masked or unmasked.
///
/// Owns its engine for its whole lifetime. The engine is never swapped, so
/// repeated calls with the same faces give the same results.
pub struct MaskClassifier {
    engine: Box<dyn InferenceEngine>,
    verbose: bool,
}

impl MaskClassifier {
    pub fn new(engine: Box<dyn InferenceEngine>) -> Self {
        Self {
            engine,
            verbose: false,
        }
    }

    /// Log every per-face mask confidence at `info` instead of `debug`.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn input_spec(&self) -> &TensorSpec {
        self.engine.input_spec()
    }

    /// Classifies every face, in order: one result per face.
    ///
    /// The first engine failure is returned and the remaining faces are
    /// not run.
    pub fn classify(
        &mut self,
        faces: &[FaceImage],
        mask_probability: f64,
    ) -> Result<Vec<ClassificationResult>, InferenceError> {
        faces
            .iter()
            .enumerate()
            .map(|(i, face)| self.classify_one(i, face, mask_probability))
            .collect()
    }

    /// True if at least one face is wearing a mask.
    pub fn classify_and_summarize(
        &mut self,
        faces: &[FaceImage],
        mask_probability: f64,
    ) -> Result<bool, InferenceError> {
        let results = self.classify(faces, mask_probability)?;
        Ok(Self::summarize(&results))
    }

    pub fn summarize(results: &[ClassificationResult]) -> bool {
        results.iter().any(ClassificationResult::is_masked)
    }

    fn classify_one(
        &mut self,
        position: usize,
        face: &FaceImage,
        mask_probability: f64,
    ) -> Result<ClassificationResult, InferenceError> {
        let no_mask = self.engine.predict(face)? as f64;
        let mask_confidence = 1.0 - no_mask;
        if self.verbose {
            log::info!("Face {position}: probability of wearing mask {mask_confidence:.4}");
        } else {
            log::debug!("Face {position}: probability of wearing mask {mask_confidence:.4}");
        }
        Ok(ClassificationResult::from_confidence(
            mask_confidence,
            mask_probability,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::face_image::ElementType;
    use crate::classification::domain::mask_label::{MaskLabel, MASK_COLOR, NO_MASK_COLOR};
    use crate::shared::constants::DEFAULT_MASK_PROBABILITY;
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // --- Stubs ---

    /// Returns the first element of the face tensor as the "no mask"
    /// probability, so each test face carries its own model output.
    /// Negative values simulate an engine failure.
    struct EchoEngine {
        spec: TensorSpec,
        calls: Arc<AtomicUsize>,
    }

    impl EchoEngine {
        fn new() -> Self {
            Self {
                spec: TensorSpec {
                    name: "input".to_string(),
                    index: 0,
                    shape: vec![1, 1],
                    element_type: ElementType::Float32,
                },
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl InferenceEngine for EchoEngine {
        fn input_spec(&self) -> &TensorSpec {
            &self.spec
        }

        fn predict(&mut self, face: &FaceImage) -> Result<f32, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match face {
                FaceImage::Float32(a) => match a.iter().next() {
                    Some(&p) if p < 0.0 => Err(InferenceError::Backend("bad tensor".to_string())),
                    Some(&p) => Ok(p),
                    None => Err(InferenceError::EmptyOutput),
                },
                FaceImage::Uint8(_) => Err(InferenceError::ElementTypeMismatch {
                    expected: ElementType::Float32,
                    actual: ElementType::Uint8,
                }),
            }
        }
    }

    // --- Helpers ---

    fn face(no_mask_probability: f32) -> FaceImage {
        FaceImage::Float32(ArrayD::from_elem(IxDyn(&[1, 1]), no_mask_probability))
    }

    fn classifier() -> MaskClassifier {
        MaskClassifier::new(Box::new(EchoEngine::new()))
    }

    fn labels(results: &[ClassificationResult]) -> Vec<MaskLabel> {
        results.iter().map(|r| r.label).collect()
    }

    // --- Tests ---

    #[test]
    fn test_empty_input_gives_empty_output() {
        let results = classifier().classify(&[], DEFAULT_MASK_PROBABILITY).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_confident_mask_is_wearing_mask() {
        let results = classifier()
            .classify(&[face(0.001)], DEFAULT_MASK_PROBABILITY)
            .unwrap();
        assert_eq!(results[0].label, MaskLabel::WearingMask);
        assert_eq!(results[0].color, MASK_COLOR);
        assert_relative_eq!(results[0].mask_confidence, 0.999, epsilon = 1e-6);
    }

    #[test]
    fn test_uncertain_face_is_no_mask() {
        let results = classifier()
            .classify(&[face(0.5)], DEFAULT_MASK_PROBABILITY)
            .unwrap();
        assert_eq!(results[0].label, MaskLabel::NoMask);
        assert_eq!(results[0].color, NO_MASK_COLOR);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 0.25 and 0.75 are exact in binary, so 1 - p == threshold exactly.
        let results = classifier().classify(&[face(0.25)], 0.75).unwrap();
        assert_eq!(results[0].label, MaskLabel::WearingMask);
    }

    #[test]
    fn test_every_face_is_classified_in_order() {
        // Regression: classification must not stop after the first face.
        let engine = EchoEngine::new();
        let calls = engine.calls.clone();
        let mut classifier = MaskClassifier::new(Box::new(engine));

        let results = classifier
            .classify(&[face(0.9), face(0.001), face(0.8)], DEFAULT_MASK_PROBABILITY)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            labels(&results),
            vec![MaskLabel::NoMask, MaskLabel::WearingMask, MaskLabel::NoMask]
        );
    }

    #[test]
    fn test_summarize_is_true_when_any_face_masked() {
        let masked = classifier()
            .classify_and_summarize(&[face(0.9), face(0.001), face(0.8)], DEFAULT_MASK_PROBABILITY)
            .unwrap();
        assert!(masked);
    }

    #[test]
    fn test_summarize_is_false_when_no_face_masked() {
        let masked = classifier()
            .classify_and_summarize(&[face(0.9), face(0.8)], DEFAULT_MASK_PROBABILITY)
            .unwrap();
        assert!(!masked);
    }

    #[test]
    fn test_summarize_empty_is_false() {
        assert!(!MaskClassifier::summarize(&[]));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let faces = [face(0.2), face(0.0001), face(0.7)];
        let mut classifier = classifier().with_verbose(true);

        let first = classifier.classify(&faces, DEFAULT_MASK_PROBABILITY).unwrap();
        let second = classifier.classify(&faces, DEFAULT_MASK_PROBABILITY).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_engine_failure_propagates() {
        let err = classifier()
            .classify(&[face(0.1), face(-1.0)], DEFAULT_MASK_PROBABILITY)
            .unwrap_err();
        assert!(matches!(err, InferenceError::Backend(_)));
    }

    #[test]
    fn test_out_of_range_threshold_is_passed_through() {
        let mut classifier = classifier();
        let all_masked = classifier.classify(&[face(1.0)], -0.5).unwrap();
        let none_masked = classifier.classify(&[face(0.0)], 2.0).unwrap();
        assert_eq!(all_masked[0].label, MaskLabel::WearingMask);
        assert_eq!(none_masked[0].label, MaskLabel::NoMask);
    }
}
