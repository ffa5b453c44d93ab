use std::path::Path;

use crate::pipeline::frame_screener::{FrameScreener, ScreeningThresholds};
use crate::pipeline::pipeline_logger::NullPipelineLogger;
use crate::pipeline::screening_report::ScreeningReport;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_stream::VideoStream;

/// Single-image screening: read → detect → classify → annotate → write.
pub struct ScreenImageUseCase {
    reader: Option<Box<dyn VideoReader>>,
    image_writer: Box<dyn ImageWriter>,
    screener: FrameScreener,
}

impl ScreenImageUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        image_writer: Box<dyn ImageWriter>,
        screener: FrameScreener,
    ) -> Self {
        Self {
            reader: Some(reader),
            image_writer,
            screener,
        }
    }

    /// Screens the image at `input_path`. The annotated image is written to
    /// `output_path` when one is given.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: Option<&Path>,
        thresholds: &ScreeningThresholds,
    ) -> Result<ScreeningReport, Box<dyn std::error::Error>> {
        let reader = self.reader.take().ok_or("Image already screened")?;
        let mut frame = {
            let mut stream = VideoStream::start(reader, input_path)?;
            if !stream.metadata().is_still_image() {
                log::warn!(
                    "{} is not a still image, screening its first frame only",
                    input_path.display()
                );
            }
            let first = stream.frames().next();
            first.ok_or("No frames in image")??
        };

        let report = self
            .screener
            .screen(&mut frame, thresholds, &mut NullPipelineLogger)?;
        log::info!(
            "{}: {} face(s), {} masked",
            input_path.display(),
            report.results.len(),
            report.masked_count()
        );

        if let Some(output_path) = output_path {
            self.image_writer.write(output_path, &frame)?;
            log::info!("Annotated image written to {}", output_path.display());
        }

        Ok(report)
    }
}
