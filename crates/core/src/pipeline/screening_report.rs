use crate::classification::domain::mask_label::ClassificationResult;
use crate::shared::region::Region;

/// Outcome of screening one frame. `regions[i]` belongs to `results[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreeningReport {
    pub frame_index: usize,
    pub regions: Vec<Region>,
    pub results: Vec<ClassificationResult>,
    pub any_masked: bool,
}

impl ScreeningReport {
    /// Label text of every face, in face order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.results.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn masked_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_masked()).count()
    }
}

/// Totals for a live session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveSummary {
    /// Frames that went through detection and classification.
    pub frames: usize,
    /// Frames with at least one masked face.
    pub masked_frames: usize,
    /// Frames dropped after an inference error.
    pub skipped_frames: usize,
}

impl LiveSummary {
    pub(crate) fn record(&mut self, report: &ScreeningReport) {
        self.frames += 1;
        if report.any_masked {
            self.masked_frames += 1;
        }
    }
}
