/// BlazeFace face detector using ONNX Runtime via `ort`.
///
/// A lightweight short-range detector: boxes and scores only, which is all
/// the mask classifier needs to crop faces.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::onnx_session::open_session;
use crate::shared::region::Region;

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.3;

/// Number of BlazeFace anchors (short-range model).
const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output: box (4) + 6 keypoints (12).
const REGRESSOR_STRIDE: usize = 16;

/// BlazeFace face detector backed by an ONNX Runtime session.
pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    anchors: Vec<[f32; 2]>,
    channels_last: bool,
}

impl OnnxBlazefaceDetector {
    /// Load a BlazeFace ONNX model. Both NCHW and NHWC exports are accepted.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = open_session(model_path)?;
        let channels_last = session
            .inputs()
            .first()
            .map(|input| match input.dtype() {
                ort::value::ValueType::Tensor { shape, .. } => {
                    shape.len() == 4 && shape[3] == 3
                }
                _ => false,
            })
            .unwrap_or(false);
        log::info!(
            "Loaded face model {} ({})",
            model_path.display(),
            if channels_last { "NHWC" } else { "NCHW" }
        );
        Ok(Self {
            session,
            anchors: generate_anchors(),
            channels_last,
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(
        &mut self,
        frame: &Frame,
        min_confidence: f64,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let input_tensor = preprocess(frame, INPUT_SIZE, self.channels_last);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // regressors: [1, 896, 16], classificators: [1, 896, 1].
        // Exports disagree on output order, so tell them apart by width.
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }
        let first = outputs[0].try_extract_array::<f32>()?;
        let second = outputs[1].try_extract_array::<f32>()?;
        let (regressors, scores) = if first.shape().last() == Some(&REGRESSOR_STRIDE) {
            (first, second)
        } else {
            (second, first)
        };
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        let mut candidates = decode(
            &self.anchors,
            reg_data,
            score_data,
            min_confidence,
            frame.width(),
            frame.height(),
        );
        Ok(nms(&mut candidates, NMS_IOU_THRESH))
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Resize frame to `size × size` and normalize to [-1, 1] float32.
fn preprocess(frame: &Frame, size: u32, channels_last: bool) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = if channels_last {
        ndarray::Array4::<f32>::zeros((1, s, s, 3))
    } else {
        ndarray::Array4::<f32>::zeros((1, 3, s, s))
    };

    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                let v = src[[src_y, src_x, c]] as f32 / 127.5 - 1.0;
                if channels_last {
                    tensor[[0, y, x, c]] = v;
                } else {
                    tensor[[0, c, y, x]] = v;
                }
            }
        }
    }

    tensor
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Generate BlazeFace anchors for the short-range model.
///
/// Two feature maps: 16×16 with 2 anchors per cell, 8×8 with 6.
fn generate_anchors() -> Vec<[f32; 2]> {
    let strides = [(8, 2), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);

    for &(stride, num) in &strides {
        let grid_size = INPUT_SIZE as usize / stride;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let cx = (x as f32 + 0.5) / grid_size as f32;
                let cy = (y as f32 + 0.5) / grid_size as f32;
                for _ in 0..num {
                    anchors.push([cx, cy]);
                }
            }
        }
    }

    anchors
}

/// Turn raw anchor offsets into frame-space regions above `min_confidence`.
fn decode(
    anchors: &[[f32; 2]],
    reg_data: &[f32],
    score_data: &[f32],
    min_confidence: f64,
    frame_width: u32,
    frame_height: u32,
) -> Vec<Region> {
    let fw = frame_width as f32;
    let fh = frame_height as f32;
    let scale = INPUT_SIZE as f32;

    score_data
        .iter()
        .zip(anchors)
        .enumerate()
        .filter_map(|(i, (&raw_score, anchor))| {
            let score = sigmoid(raw_score) as f64;
            if score < min_confidence {
                return None;
            }
            let reg = reg_data.get(i * REGRESSOR_STRIDE..i * REGRESSOR_STRIDE + 4)?;

            let cx = anchor[0] + reg[0] / scale;
            let cy = anchor[1] + reg[1] / scale;
            let w = reg[2] / scale;
            let h = reg[3] / scale;

            let x1 = ((cx - w / 2.0) * fw).max(0.0);
            let y1 = ((cy - h / 2.0) * fh).max(0.0);
            let x2 = ((cx + w / 2.0) * fw).min(fw);
            let y2 = ((cy + h / 2.0) * fh).min(fh);

            let region = Region::new(
                x1 as i32,
                y1 as i32,
                (x2 - x1) as i32,
                (y2 - y1) as i32,
                score,
            );
            (!region.is_empty()).then_some(region)
        })
        .collect()
}

fn nms(candidates: &mut [Region], iou_thresh: f64) -> Vec<Region> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<Region> = Vec::new();
    for candidate in candidates.iter() {
        if keep.iter().all(|k| k.iou(candidate) <= iou_thresh) {
            keep.push(candidate.clone());
        }
    }
    keep
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
