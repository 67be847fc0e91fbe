//! Eye Aspect Ratio estimation.
//!
//! EAR is the ratio of vertical lid separation to horizontal eye width:
//! `(|p2 p6| + |p3 p5|) / (2 |p1 p4|)`. The ratio is dimensionless, so it is
//! insensitive to the subject's distance from the camera and to resolution.
//! It degrades when the face rolls out of plane; accepted limitation.

use crate::detection::domain::eye::EyeIndices;
use crate::shared::landmarks::LandmarkSet;

/// One frame's (left, right) EAR pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EarSample {
    pub left: f64,
    pub right: f64,
}

impl EarSample {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Combined EAR used for blink calibration and display.
    pub fn average(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

/// Computes the EAR for one eye. Pure function of its inputs.
///
/// Callers must guard that a face was detected this frame and that all six
/// ids in `eye` are valid for `landmarks`; panics on an out-of-bounds id.
pub fn compute_ear(landmarks: &LandmarkSet, eye: &EyeIndices) -> f64 {
    let p1 = landmarks.point(eye.outer_corner);
    let p2 = landmarks.point(eye.upper_lid_1);
    let p3 = landmarks.point(eye.upper_lid_2);
    let p4 = landmarks.point(eye.inner_corner);
    let p5 = landmarks.point(eye.lower_lid_1);
    let p6 = landmarks.point(eye.lower_lid_2);

    let vertical_1 = p2.distance(&p6);
    let vertical_2 = p3.distance(&p5);
    let horizontal = p1.distance(&p4);

    (vertical_1 + vertical_2) / (2.0 * horizontal)
}

/// Convenience over [`compute_ear`] for both eyes at once.
pub fn sample_both(landmarks: &LandmarkSet, left: &EyeIndices, right: &EyeIndices) -> EarSample {
    EarSample::new(compute_ear(landmarks, left), compute_ear(landmarks, right))
}
