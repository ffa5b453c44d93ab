use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from an image, a video file or a live stream.
///
/// Prefer driving a reader through [`VideoStream`](super::video_stream::VideoStream),
/// which guarantees `close` runs on every exit path.
pub trait VideoReader: Send {
    /// Opens the source and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order. Live sources never
    /// end on their own.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the reader. Must be idempotent.
    fn close(&mut self);
}
