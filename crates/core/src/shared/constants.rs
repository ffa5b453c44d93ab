pub const MASK_MODEL_NAME: &str = "mask_detector_quant.onnx";
pub const FACE_MODEL_NAME: &str = "blazeface_short_range.onnx";

/// Directory name under the user cache used for downloaded models.
pub const MODEL_CACHE_DIR_NAME: &str = "maskguard";

/// Minimum "wearing mask" confidence for single-frame screening.
pub const DEFAULT_MASK_PROBABILITY: f64 = 0.995;

/// Live streams use a slightly looser threshold.
pub const LIVE_MASK_PROBABILITY: f64 = 0.975;

/// Minimum detector confidence for a face to be classified.
pub const DEFAULT_FACE_PROBABILITY: f64 = 0.9;

/// Live frames are downscaled to this width before detection.
pub const LIVE_FRAME_MAX_WIDTH: u32 = 400;

/// Line typed on stdin to stop a live session.
pub const STOP_KEY: &str = "q";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
