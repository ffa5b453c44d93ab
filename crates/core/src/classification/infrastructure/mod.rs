pub mod onnx_inference_engine;
