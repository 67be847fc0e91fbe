//! Synthetic landmark streams for demos and tests.
//!
//! The source is scripted as per-frame `(left, right)` EAR targets (`None`
//! for a no-face frame) and synthesizes full-size landmark sets whose eye
//! points realize those targets exactly, so the index mapping, estimator,
//! and state machine all run against it unchanged.

use std::path::Path;

use crate::detection::domain::eye::{EyeIndices, LEFT_EYE, RIGHT_EYE};
use crate::shared::constants::DEFAULT_SOURCE_FPS;
use crate::shared::landmarks::{LandmarkFrame, LandmarkSet, Point};
use crate::source::domain::landmark_source::{LandmarkSource, SourceMetadata};

/// Landmark count of the face mesh the id mapping targets.
const MESH_SIZE: usize = 468;

/// Eye width used for synthesized faces; the EAR is width-invariant, the
/// value only has to be non-degenerate.
const EYE_WIDTH: f64 = 0.12;

/// Builds a full-size landmark set whose eyes measure the requested EARs.
pub fn synthesize_face(left_ear: f64, right_ear: f64) -> LandmarkSet {
    let mut points = vec![Point::new(0.0, 0.0); MESH_SIZE];
    place_eye(&mut points, &LEFT_EYE, (0.58, 0.45), left_ear);
    place_eye(&mut points, &RIGHT_EYE, (0.30, 0.45), right_ear);
    LandmarkSet::new(points)
}

fn place_eye(points: &mut [Point], eye: &EyeIndices, center: (f64, f64), ear: f64) {
    let (cx, cy) = center;
    let half_w = EYE_WIDTH / 2.0;
    // Both lid pairs sit at the same x, so each vertical separation equals
    // `v` and the measured EAR is exactly v / width.
    let v = ear * EYE_WIDTH;

    points[eye.outer_corner] = Point::new(cx - half_w, cy);
    points[eye.inner_corner] = Point::new(cx + half_w, cy);
    points[eye.upper_lid_1] = Point::new(cx - 0.2 * EYE_WIDTH, cy - v / 2.0);
    points[eye.lower_lid_2] = Point::new(cx - 0.2 * EYE_WIDTH, cy + v / 2.0);
    points[eye.upper_lid_2] = Point::new(cx + 0.2 * EYE_WIDTH, cy - v / 2.0);
    points[eye.lower_lid_1] = Point::new(cx + 0.2 * EYE_WIDTH, cy + v / 2.0);
}

/// Replays a scripted EAR sequence as synthesized landmark frames.
pub struct ScriptedLandmarkSource {
    frames: Vec<LandmarkFrame>,
}

impl ScriptedLandmarkSource {
    /// `script` holds one entry per frame: `Some((left, right))` EAR targets
    /// or `None` for a frame with no detected face.
    pub fn from_ear_script(script: Vec<Option<(f64, f64)>>) -> Self {
        let frames = script
            .into_iter()
            .enumerate()
            .map(|(index, targets)| match targets {
                Some((left, right)) => {
                    LandmarkFrame::with_face(index, synthesize_face(left, right))
                }
                None => LandmarkFrame::no_face(index),
            })
            .collect();
        Self { frames }
    }

    /// A canned session: five deliberate blinks, one wink per eye, and a
    /// short face-lost stretch. Enough to exercise calibration and every
    /// gesture without a camera.
    pub fn demo() -> Self {
        let open = (0.30, 0.30);
        let closed = (0.08, 0.08);

        let mut script: Vec<Option<(f64, f64)>> = Vec::new();
        script.extend(std::iter::repeat(Some(open)).take(10));
        for _ in 0..5 {
            script.extend(std::iter::repeat(Some(closed)).take(3));
            script.extend(std::iter::repeat(Some(open)).take(10));
        }
        script.extend(std::iter::repeat(Some((0.33, 0.08))).take(4)); // right wink
        script.extend(std::iter::repeat(Some(open)).take(10));
        script.extend(std::iter::repeat(Some((0.08, 0.33))).take(4)); // left wink
        script.extend(std::iter::repeat(Some(open)).take(10));
        script.extend(std::iter::repeat(None).take(5)); // face lost
        script.extend(std::iter::repeat(Some(open)).take(5));

        Self::from_ear_script(script)
    }
}

impl LandmarkSource for ScriptedLandmarkSource {
    /// The path is ignored; a scripted stream has no backing file.
    fn open(&mut self, _path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        Ok(SourceMetadata {
            total_frames: self.frames.len(),
            fps: DEFAULT_SOURCE_FPS,
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<LandmarkFrame, Box<dyn std::error::Error>>> + '_> {
        Box::new(self.frames.drain(..).map(Ok))
    }

    fn close(&mut self) {
        self.frames.clear();
    }
}
