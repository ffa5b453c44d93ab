pub mod classification_error;
pub mod face_image;
pub mod inference_engine;
pub mod mask_classifier;
pub mod mask_label;
