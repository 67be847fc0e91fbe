use std::path::Path;
use std::time::{Duration, Instant};

use crate::shared::landmarks::LandmarkFrame;
use crate::source::domain::landmark_source::{LandmarkSource, SourceMetadata};

/// Decorator that holds frame delivery to a target rate.
///
/// A live camera paces itself; replayed and scripted streams would otherwise
/// arrive instantaneously, which starves anything sampling on wall-clock
/// time (the calibration timer). Scheduling is deadline-based, so a slow
/// consumer does not accumulate extra delay.
pub struct PacedLandmarkSource {
    inner: Box<dyn LandmarkSource>,
    interval: Duration,
}

impl PacedLandmarkSource {
    pub fn new(inner: Box<dyn LandmarkSource>, fps: f64) -> Result<Self, &'static str> {
        if !(fps > 0.0) {
            return Err("fps must be positive");
        }
        Ok(Self {
            inner,
            interval: Duration::from_secs_f64(1.0 / fps),
        })
    }
}

impl LandmarkSource for PacedLandmarkSource {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        let mut metadata = self.inner.open(path)?;
        metadata.fps = 1.0 / self.interval.as_secs_f64();
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<LandmarkFrame, Box<dyn std::error::Error>>> + '_> {
        let interval = self.interval;
        let mut deadline = Instant::now();
        Box::new(self.inner.frames().map(move |frame| {
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            deadline += interval;
            frame
        }))
    }

    fn close(&mut self) {
        self.inner.close();
    }
}
