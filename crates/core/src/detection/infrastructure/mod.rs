pub mod detecting_face_source;
pub mod face_cropper;
pub mod onnx_blazeface_detector;
