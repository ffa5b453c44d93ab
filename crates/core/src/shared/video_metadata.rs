use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// 0 for still images and streams that don't report a rate.
    pub fps: f64,
    /// 0 when the source is unbounded (live streams).
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub fn is_still_image(&self) -> bool {
        self.total_frames == 1 && self.fps == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_metadata_is_still() {
        let meta = VideoMetadata {
            width: 800,
            height: 600,
            fps: 0.0,
            total_frames: 1,
            codec: "png".to_string(),
            source_path: None,
        };
        assert!(meta.is_still_image());
    }

    #[test]
    fn test_stream_metadata_is_not_still() {
        let meta = VideoMetadata {
            width: 640,
            height: 480,
            fps: 30.0,
            total_frames: 0,
            codec: "h264".to_string(),
            source_path: Some(PathBuf::from("rtsp://camera/stream")),
        };
        assert!(!meta.is_still_image());
    }
}
