use std::time::Instant;

use crate::classification::domain::face_image::FaceImage;
use crate::classification::domain::mask_classifier::MaskClassifier;
use crate::detection::domain::face_source::FaceSource;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::screening_report::ScreeningReport;
use crate::rendering::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{
    DEFAULT_FACE_PROBABILITY, DEFAULT_MASK_PROBABILITY, LIVE_MASK_PROBABILITY,
};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Per-call thresholds. Not range-checked here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreeningThresholds {
    pub mask_probability: f64,
    pub face_probability: f64,
}

impl Default for ScreeningThresholds {
    fn default() -> Self {
        Self {
            mask_probability: DEFAULT_MASK_PROBABILITY,
            face_probability: DEFAULT_FACE_PROBABILITY,
        }
    }
}

impl ScreeningThresholds {
    pub fn live() -> Self {
        Self {
            mask_probability: LIVE_MASK_PROBABILITY,
            ..Self::default()
        }
    }
}

/// Detect → classify → annotate for a single frame.
///
/// Each step hands its output to the next as a value; nothing is kept
/// between frames.
pub struct FrameScreener {
    face_source: Box<dyn FaceSource>,
    classifier: MaskClassifier,
    annotator: FrameAnnotator,
}

impl FrameScreener {
    pub fn new(
        face_source: Box<dyn FaceSource>,
        classifier: MaskClassifier,
        annotator: FrameAnnotator,
    ) -> Self {
        Self {
            face_source,
            classifier,
            annotator,
        }
    }

    /// Screens `frame` and draws the verdicts onto it.
    ///
    /// Classifier failures come back as a boxed
    /// [`InferenceError`](crate::classification::domain::classification_error::InferenceError),
    /// so callers can tell them apart with `downcast_ref`.
    pub fn screen(
        &mut self,
        frame: &mut Frame,
        thresholds: &ScreeningThresholds,
        logger: &mut dyn PipelineLogger,
    ) -> Result<ScreeningReport, Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let faces = self.face_source.faces(frame, thresholds.face_probability)?;
        logger.timing("detect", elapsed_ms(t0));

        let (regions, images): (Vec<Region>, Vec<FaceImage>) =
            faces.into_iter().map(|f| (f.region, f.image)).unzip();

        let t0 = Instant::now();
        let results = self
            .classifier
            .classify(&images, thresholds.mask_probability)?;
        logger.timing("classify", elapsed_ms(t0));

        let t0 = Instant::now();
        self.annotator.annotate(frame, &regions, &results);
        logger.timing("annotate", elapsed_ms(t0));

        let report = ScreeningReport {
            frame_index: frame.index(),
            any_masked: MaskClassifier::summarize(&results),
            regions,
            results,
        };
        logger.metric("faces", report.results.len() as f64);
        logger.metric("masked_faces", report.masked_count() as f64);
        Ok(report)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Stub collaborators shared by the pipeline tests.

    use super::*;
    use crate::classification::domain::classification_error::InferenceError;
    use crate::classification::domain::face_image::{ElementType, TensorSpec};
    use crate::classification::domain::inference_engine::InferenceEngine;
    use crate::detection::domain::face_source::DetectedFace;
    use ndarray::{ArrayD, IxDyn};

    /// Reports the first tensor element as the "no mask" probability;
    /// NaN simulates an engine failure.
    pub struct EchoEngine {
        spec: TensorSpec,
    }

    impl EchoEngine {
        pub fn new() -> Self {
            Self {
                spec: TensorSpec {
                    name: "input".to_string(),
                    index: 0,
                    shape: vec![1, 1],
                    element_type: ElementType::Float32,
                },
            }
        }
    }

    impl InferenceEngine for EchoEngine {
        fn input_spec(&self) -> &TensorSpec {
            &self.spec
        }

        fn predict(&mut self, face: &FaceImage) -> Result<f32, InferenceError> {
            match face {
                FaceImage::Float32(a) => match a.iter().next() {
                    Some(p) if p.is_nan() => Err(InferenceError::Backend("NaN input".to_string())),
                    Some(&p) => Ok(p),
                    None => Err(InferenceError::EmptyOutput),
                },
                FaceImage::Uint8(_) => Err(InferenceError::Backend("unexpected u8".to_string())),
            }
        }
    }

    /// Hands out one scripted list of "no mask" probabilities per frame,
    /// cycling when it runs out. Faces are laid out left to right.
    pub struct ScriptedFaceSource {
        frames: Vec<Vec<f32>>,
        calls: usize,
    }

    impl ScriptedFaceSource {
        pub fn new(frames: Vec<Vec<f32>>) -> Self {
            Self { frames, calls: 0 }
        }
    }

    impl FaceSource for ScriptedFaceSource {
        fn faces(
            &mut self,
            _frame: &Frame,
            _face_probability: f64,
        ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
            let script = &self.frames[self.calls % self.frames.len()];
            self.calls += 1;
            Ok(script
                .iter()
                .enumerate()
                .map(|(i, &p)| DetectedFace {
                    region: Region::new(2 + 12 * i as i32, 4, 10, 10, 0.99),
                    image: FaceImage::Float32(ArrayD::from_elem(IxDyn(&[1, 1]), p)),
                })
                .collect())
        }
    }

    pub fn screener(frames: Vec<Vec<f32>>) -> FrameScreener {
        FrameScreener::new(
            Box::new(ScriptedFaceSource::new(frames)),
            MaskClassifier::new(Box::new(EchoEngine::new())),
            FrameAnnotator::new(1, 0),
        )
    }

    pub fn white_frame(index: usize) -> Frame {
        Frame::new(vec![255u8; 64 * 32 * 3], 64, 32, 3, index)
    }
}
