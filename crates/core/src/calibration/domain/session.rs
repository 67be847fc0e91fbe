//! Guided calibration state.
//!
//! The user blinks deliberately a fixed number of times; the session tracks
//! how many blinks completed and the lowest combined EAR seen while doing
//! so, then derives a personalized closed-eye threshold sitting just above
//! that minimum.

use crate::shared::constants::{
    CALIBRATION_HEADROOM, CALIBRATION_TARGET_BLINKS, CALIBRATION_THRESHOLD_CEILING,
};

/// One calibration attempt. Ephemeral: created on start, discarded on
/// completion or abandonment; not re-entrant.
pub struct CalibrationSession {
    target_blinks: usize,
    completed_blinks: usize,
    /// `+inf` until the first valid sample arrives.
    min_observed_ear: f64,
}

impl CalibrationSession {
    pub fn new(target_blinks: usize) -> Self {
        Self {
            target_blinks,
            completed_blinks: 0,
            min_observed_ear: f64::INFINITY,
        }
    }

    /// Records one combined-EAR sample. Samples from no-face frames must not
    /// be passed in; the caller skips them.
    pub fn record_sample(&mut self, ear: f64) {
        if ear < self.min_observed_ear {
            self.min_observed_ear = ear;
        }
    }

    /// Records one completed blink and returns progress in [0, 1].
    pub fn record_blink(&mut self) -> f64 {
        if self.completed_blinks < self.target_blinks {
            self.completed_blinks += 1;
        }
        self.progress()
    }

    pub fn progress(&self) -> f64 {
        self.completed_blinks as f64 / self.target_blinks as f64
    }

    pub fn is_complete(&self) -> bool {
        self.completed_blinks >= self.target_blinks
    }

    /// The minimum combined EAR observed so far, if any sample arrived.
    pub fn min_observed_ear(&self) -> Option<f64> {
        if self.min_observed_ear.is_finite() {
            Some(self.min_observed_ear)
        } else {
            None
        }
    }

    /// Derives the personalized threshold: headroom above the observed blink
    /// minimum, clamped to the ceiling. With no samples at all the sentinel
    /// collapses to the ceiling instead of failing the session.
    pub fn derive_threshold(&self) -> f64 {
        (self.min_observed_ear + CALIBRATION_HEADROOM).min(CALIBRATION_THRESHOLD_CEILING)
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new(CALIBRATION_TARGET_BLINKS)
    }
}
