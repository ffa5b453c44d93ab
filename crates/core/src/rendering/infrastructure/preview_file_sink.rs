use std::path::PathBuf;

use crate::classification::domain::mask_label::ClassificationResult;
use crate::rendering::domain::frame_sink::FrameSink;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Keeps one image file updated with the latest annotated frame, for an
/// external viewer to display.
pub struct PreviewFileSink {
    writer: Box<dyn ImageWriter>,
    path: PathBuf,
}

impl PreviewFileSink {
    pub fn new(writer: Box<dyn ImageWriter>, path: PathBuf) -> Self {
        Self { writer, path }
    }
}

impl FrameSink for PreviewFileSink {
    fn show(
        &mut self,
        frame: &Frame,
        results: &[ClassificationResult],
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.writer.write(&self.path, frame)?;
        if !results.is_empty() {
            let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
            log::debug!("Frame {}: {}", frame.index(), labels.join(", "));
        }
        Ok(())
    }
}
