use std::path::Path;

/// Opens an ONNX Runtime session for a small single-image model.
///
/// Inter-op parallelism is pinned to one thread since every model here is
/// run one image at a time; intra-op threads use the available cores.
pub fn open_session(model_path: &Path) -> ort::Result<ort::session::Session> {
    let intra_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let session = ort::session::Session::builder()?
        .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
        .with_inter_threads(1)?
        .with_intra_threads(intra_threads)?
        .with_execution_providers(preferred_execution_providers())?
        .commit_from_file(model_path)?;
    Ok(session)
}

/// Platform accelerators, tried before the CPU provider.
fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_an_error() {
        assert!(open_session(Path::new("/nonexistent/model.onnx")).is_err());
    }

    #[test]
    fn test_garbage_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();
        let err = open_session(&path).err().unwrap();
        assert!(!err.to_string().is_empty());
    }
}
