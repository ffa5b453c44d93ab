use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// An open video source that is closed when dropped.
///
/// Acquired with [`VideoStream::start`]; released on every exit path,
/// including `?` returns and panics unwinding out of a processing loop.
pub struct VideoStream {
    reader: Box<dyn VideoReader>,
    metadata: VideoMetadata,
}

impl VideoStream {
    pub fn start(
        mut reader: Box<dyn VideoReader>,
        path: &Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let metadata = match reader.open(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                reader.close();
                return Err(e);
            }
        };
        log::info!(
            "Opened {} ({}x{}, {:.1} fps)",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.fps
        );
        Ok(Self { reader, metadata })
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        self.reader.frames()
    }
}

impl Drop for VideoStream {
    fn drop(&mut self) {
        self.reader.close();
        log::debug!("Video stream closed");
    }
}
