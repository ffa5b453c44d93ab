use crossbeam_channel::{Receiver, TryRecvError};

use crate::classification::domain::classification_error::InferenceError;
use crate::pipeline::frame_screener::{FrameScreener, ScreeningThresholds};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::screening_report::LiveSummary;
use crate::rendering::domain::frame_sink::FrameSink;
use crate::shared::constants::LIVE_FRAME_MAX_WIDTH;
use crate::video::domain::video_stream::VideoStream;

/// Screens a video file or live stream frame by frame until it ends or a
/// stop is requested.
///
/// A frame whose classification fails is logged and skipped. Any other
/// error ends the session. The stream is closed on every exit path.
pub struct LiveScreeningUseCase {
    screener: FrameScreener,
    sink: Box<dyn FrameSink>,
    logger: Box<dyn PipelineLogger>,
    max_width: u32,
    stop: Option<Receiver<()>>,
}

impl LiveScreeningUseCase {
    pub fn new(
        screener: FrameScreener,
        sink: Box<dyn FrameSink>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            screener,
            sink,
            logger,
            max_width: LIVE_FRAME_MAX_WIDTH,
            stop: None,
        }
    }

    /// Any message on `stop` ends the session before the next frame.
    /// A disconnected channel is ignored.
    pub fn with_stop_signal(mut self, stop: Receiver<()>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn execute(
        &mut self,
        mut stream: VideoStream,
        thresholds: &ScreeningThresholds,
    ) -> Result<LiveSummary, Box<dyn std::error::Error>> {
        let total = stream.metadata().total_frames;
        let mut summary = LiveSummary::default();

        for frame in stream.frames() {
            if self.stop_requested() {
                log::info!("Stop requested, ending session");
                break;
            }
            let mut frame = frame?.downscaled_to_width(self.max_width);

            match self
                .screener
                .screen(&mut frame, thresholds, self.logger.as_mut())
            {
                Ok(report) => {
                    summary.record(&report);
                    self.sink.show(&frame, &report.results)?;
                }
                Err(e) => match e.downcast_ref::<InferenceError>() {
                    Some(inference) => {
                        log::warn!("Skipping frame {}: {inference}", frame.index());
                        summary.skipped_frames += 1;
                    }
                    None => return Err(e),
                },
            }
            self.logger
                .progress(summary.frames + summary.skipped_frames, total);
        }

        self.logger.summary();
        log::info!(
            "Screened {} frames ({} with a masked face, {} skipped)",
            summary.frames,
            summary.masked_frames,
            summary.skipped_frames
        );
        Ok(summary)
    }

    fn stop_requested(&self) -> bool {
        match &self.stop {
            Some(rx) => match rx.try_recv() {
                Ok(()) => true,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
            },
            None => false,
        }
    }
}
