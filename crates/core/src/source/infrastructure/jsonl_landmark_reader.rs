//! Replay of recorded landmark sessions.
//!
//! One JSON object per line: `{"frame": 12, "landmarks": [[x, y], ...]}`,
//! with `"landmarks": null` for frames where the detector found no face.
//! Records are replayed in file order; the `frame` field is carried through
//! for display and is not required to be contiguous.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::DEFAULT_SOURCE_FPS;
use crate::shared::landmarks::{LandmarkFrame, LandmarkSet, Point};
use crate::source::domain::landmark_source::{LandmarkSource, SourceMetadata};

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("recording not opened")]
    NotOpened,
}

/// On-disk record shape. Kept separate from the domain types so the wire
/// format can evolve without touching them.
#[derive(Serialize, Deserialize)]
struct RecordedFrame {
    frame: usize,
    landmarks: Option<Vec<(f64, f64)>>,
}

impl From<RecordedFrame> for LandmarkFrame {
    fn from(record: RecordedFrame) -> Self {
        let landmarks = record.landmarks.map(|points| {
            LandmarkSet::new(points.into_iter().map(|(x, y)| Point::new(x, y)).collect())
        });
        LandmarkFrame {
            index: record.frame,
            landmarks,
        }
    }
}

/// Reads a recorded landmark session from a JSONL file.
pub struct JsonlLandmarkReader {
    records: Vec<LandmarkFrame>,
    opened: bool,
}

impl JsonlLandmarkReader {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            opened: false,
        }
    }

    fn parse(path: &Path) -> Result<Vec<LandmarkFrame>, ReplayError> {
        let contents = fs::read_to_string(path).map_err(|e| ReplayError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut records = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: RecordedFrame =
                serde_json::from_str(line).map_err(|e| ReplayError::Parse {
                    line: number + 1,
                    source: e,
                })?;
            records.push(record.into());
        }
        Ok(records)
    }
}

impl Default for JsonlLandmarkReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkSource for JsonlLandmarkReader {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        self.records = Self::parse(path)?;
        self.opened = true;
        log::debug!(
            "opened recording {} ({} frames)",
            path.display(),
            self.records.len()
        );
        Ok(SourceMetadata {
            total_frames: self.records.len(),
            fps: DEFAULT_SOURCE_FPS,
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<LandmarkFrame, Box<dyn std::error::Error>>> + '_> {
        if !self.opened {
            return Box::new(std::iter::once(Err(Box::new(ReplayError::NotOpened)
                as Box<dyn std::error::Error>)));
        }
        Box::new(self.records.drain(..).map(Ok))
    }

    fn close(&mut self) {
        self.records.clear();
        self.opened = false;
    }
}
