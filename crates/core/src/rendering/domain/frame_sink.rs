use crate::classification::domain::mask_label::ClassificationResult;
use crate::shared::frame::Frame;

/// Receives annotated frames for display.
pub trait FrameSink: Send {
    fn show(
        &mut self,
        frame: &Frame,
        results: &[ClassificationResult],
    ) -> Result<(), Box<dyn std::error::Error>>;
}

/// Discards frames. Used for headless runs and tests.
pub struct NullFrameSink;

impl FrameSink for NullFrameSink {
    fn show(
        &mut self,
        _frame: &Frame,
        _results: &[ClassificationResult],
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
