use std::path::Path;

use crate::shared::landmarks::LandmarkFrame;

/// Capture properties of a landmark stream.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub total_frames: usize,
    pub fps: f64,
}

/// Delivers per-frame landmark sets from a camera, recording, or synthetic
/// generator.
///
/// Implementations handle transport details (file format, pacing, the
/// upstream detector) while the pipeline works with the abstract
/// `LandmarkFrame`. A frame with no detected face is delivered as
/// `landmarks: None`, never silently dropped, so consumers can distinguish
/// "no face" from "stream ended".
pub trait LandmarkSource: Send {
    /// Opens a stream and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in capture order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<LandmarkFrame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
